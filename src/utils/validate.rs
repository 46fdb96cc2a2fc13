//! 输入校验

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,32}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "password123",
    "qwerty123",
    "abcd1234",
    "welcome1",
    "letmein1",
    "student1",
    "teacher1",
];

pub const MAX_DISPLAY_NAME_LEN: usize = 64;
pub const MAX_TITLE_LEN: usize = 200;

/// 用户名：5-32 位字母、数字、下划线或连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err("用户名须为 5-32 位字母、数字、下划线或连字符")
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() <= 254 && EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err("邮箱格式不正确")
    }
}

/// 密码策略：至少 8 位，同时包含大写、小写字母和数字，且不是常见弱密码
///
/// 返回全部不满足的规则，便于前端逐条提示。
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let rules: [(bool, &'static str); 5] = [
        (password.chars().count() >= 8, "密码长度至少 8 位"),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "密码须包含大写字母",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "密码须包含小写字母",
        ),
        (password.chars().any(|c| c.is_ascii_digit()), "密码须包含数字"),
        (
            !COMMON_PASSWORDS
                .iter()
                .any(|weak| password.eq_ignore_ascii_case(weak)),
            "密码过于常见",
        ),
    ];

    let failed: Vec<&'static str> = rules
        .into_iter()
        .filter_map(|(ok, msg)| (!ok).then_some(msg))
        .collect();

    if failed.is_empty() { Ok(()) } else { Err(failed) }
}

/// 密码校验，失败时合并为一条消息
pub fn validate_password_message(password: &str) -> Result<(), String> {
    validate_password(password).map_err(|errors| errors.join("; "))
}

pub fn validate_display_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err("显示名称不能为空")
    } else if trimmed.chars().count() > MAX_DISPLAY_NAME_LEN {
        Err("显示名称过长")
    } else {
        Ok(())
    }
}

/// 课程、作业、测验、徽章等的标题
pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err("标题不能为空")
    } else if trimmed.chars().count() > MAX_TITLE_LEN {
        Err("标题过长")
    } else {
        Ok(())
    }
}

/// 分数须为有限值且在 0..=max 之间
pub fn validate_score(score: f64, max_score: f64) -> Result<(), String> {
    if score.is_finite() && (0.0..=max_score).contains(&score) {
        Ok(())
    } else {
        Err(format!("分数须在 0 到 {max_score} 之间"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("parent@example.com").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_password_reports_every_failed_rule() {
        assert!(validate_password("SecurePass123").is_ok());

        let errors = validate_password("abc").unwrap_err();
        assert!(errors.contains(&"密码长度至少 8 位"));
        assert!(errors.contains(&"密码须包含大写字母"));
        assert!(errors.contains(&"密码须包含数字"));

        let common = validate_password("Password123").unwrap_err();
        assert_eq!(common, vec!["密码过于常见"]);
    }

    #[test]
    fn test_title_and_score() {
        assert!(validate_title("  ").is_err());
        assert!(validate_title("Week 1").is_ok());
        assert!(validate_score(50.0, 50.0).is_ok());
        assert!(validate_score(-1.0, 50.0).is_err());
        assert!(validate_score(f64::NAN, 50.0).is_err());
        assert!(validate_display_name("").is_err());
    }
}
