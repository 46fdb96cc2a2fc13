//! 测验判分
//!
//! 每道题按 `points` 计分，答案与 `correct_option` 相同才得分，未作答按错误处理。

use crate::models::quizzes::entities::{Quiz, QuizQuestion, QuizScore};

/// 创建测验时的题目校验
pub fn validate_questions(questions: &[QuizQuestion]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("测验至少需要一道题目".to_string());
    }

    for (index, question) in questions.iter().enumerate() {
        let number = index + 1;
        if question.prompt.trim().is_empty() {
            return Err(format!("第 {number} 题题干不能为空"));
        }
        if question.options.len() < 2 {
            return Err(format!("第 {number} 题至少需要两个选项"));
        }
        if question.correct_option >= question.options.len() {
            return Err(format!("第 {number} 题的正确答案超出选项范围"));
        }
        if !(question.points.is_finite() && question.points > 0.0) {
            return Err(format!("第 {number} 题分值必须大于 0"));
        }
    }

    Ok(())
}

pub fn validate_settings(pass_percentage: f64, max_attempts: Option<i32>) -> Result<(), String> {
    if !(0.0..=100.0).contains(&pass_percentage) {
        return Err("及格线必须在 0 到 100 之间".to_string());
    }
    if max_attempts.is_some_and(|n| n < 1) {
        return Err("最大作答次数至少为 1".to_string());
    }
    Ok(())
}

/// 作答数量必须与题目数量一致，选项下标必须在范围内
pub fn validate_answers(quiz: &Quiz, answers: &[Option<usize>]) -> Result<(), String> {
    if answers.len() != quiz.questions.len() {
        return Err(format!(
            "作答数量 ({}) 与题目数量 ({}) 不一致",
            answers.len(),
            quiz.questions.len()
        ));
    }

    for (index, (question, answer)) in quiz.questions.iter().zip(answers).enumerate() {
        if let Some(choice) = answer
            && *choice >= question.options.len()
        {
            return Err(format!("第 {} 题的答案超出选项范围", index + 1));
        }
    }

    Ok(())
}

pub fn grade_quiz(quiz: &Quiz, answers: &[Option<usize>]) -> QuizScore {
    let max_score = quiz.total_points();
    let score: f64 = quiz
        .questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| **answer == Some(question.correct_option))
        .map(|(question, _)| question.points)
        .sum();

    let percentage = if max_score > 0.0 {
        score / max_score * 100.0
    } else {
        0.0
    };

    QuizScore {
        score,
        max_score,
        percentage,
        passed: percentage >= quiz.pass_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(correct_option: usize, points: f64) -> QuizQuestion {
        QuizQuestion {
            prompt: "2 + 2 = ?".into(),
            options: vec!["3".into(), "4".into(), "5".into()],
            correct_option,
            points,
        }
    }

    fn quiz(questions: Vec<QuizQuestion>, pass_percentage: f64) -> Quiz {
        let now = Utc::now();
        Quiz {
            id: 1,
            course_id: 1,
            created_by: 1,
            title: "Arithmetic".into(),
            description: None,
            questions,
            pass_percentage,
            max_attempts: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_weighted_scoring_and_unanswered() {
        let q = quiz(vec![question(1, 2.0), question(0, 1.0), question(2, 1.0)], 50.0);
        let score = grade_quiz(&q, &[Some(1), None, Some(0)]);
        assert_eq!(score.score, 2.0);
        assert_eq!(score.max_score, 4.0);
        assert_eq!(score.percentage, 50.0);
        assert!(score.passed);

        let failed = grade_quiz(&q, &[Some(0), Some(0), None]);
        assert_eq!(failed.percentage, 25.0);
        assert!(!failed.passed);
    }

    #[test]
    fn test_answer_validation() {
        let q = quiz(vec![question(1, 1.0), question(0, 1.0)], 60.0);
        assert!(validate_answers(&q, &[Some(1), None]).is_ok());
        assert!(validate_answers(&q, &[Some(1)]).is_err());
        assert!(validate_answers(&q, &[Some(1), Some(3)]).is_err());
    }

    #[test]
    fn test_question_validation() {
        assert!(validate_questions(&[]).is_err());
        assert!(validate_questions(&[question(1, 1.0)]).is_ok());
        assert!(validate_questions(&[question(5, 1.0)]).is_err());
        assert!(validate_questions(&[question(0, 0.0)]).is_err());

        let mut single_option = question(0, 1.0);
        single_option.options.truncate(1);
        assert!(validate_questions(&[single_option]).is_err());
    }

    #[test]
    fn test_settings_validation() {
        assert!(validate_settings(60.0, Some(3)).is_ok());
        assert!(validate_settings(120.0, None).is_err());
        assert!(validate_settings(60.0, Some(0)).is_err());
    }
}
