use std::env;
use std::str::FromStr;

/// 读取布尔型环境变量：支持 true/false/1/0（大小写不敏感）
pub fn env_is_true(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => {
            let v = v.trim();
            v.eq_ignore_ascii_case("true") || v == "1"
        }
        Err(_) => default,
    }
}

/// 读取字符串环境变量，若不存在则返回默认值
pub fn env_or_default(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(v) => v,
        Err(_) => default.to_string(),
    }
}

/// 读取 usize 环境变量，不存在或解析失败返回默认值
pub fn env_usize(key: &str, default: usize) -> usize {
    match env::var(key) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(default),
        Err(_) => default,
    }
}

/// 解析逗号分隔的列表，空项忽略，任何一项解析失败返回错误
pub fn parse_list<T>(value: &str) -> Result<Vec<T>, String>
where
    T: FromStr<Err = String>,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(T::from_str)
        .collect()
}
