//! SQL 辅助函数

use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

/// 转义 LIKE 通配符，转义字符为反斜杠
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 任一列包含搜索词（按字面匹配）
pub fn search_condition<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_pattern(term.trim()));
    columns.iter().fold(Condition::any(), |cond, column| {
        cond.add(column.like(LikeExpr::new(pattern.clone()).escape('\\')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("rust"), "rust");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b\\c"), "a\\_b\\\\c");
    }
}
