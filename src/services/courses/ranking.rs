//! 课程排行榜计算
//!
//! 每个学生的成绩为其各评分项目百分比的平均值；没有任何评分项目的学生不参与排名，
//! 排在所有有名次的学生之后。名次采用标准竞赛排名（1, 2, 2, 4）。

use std::cmp::Ordering;

use crate::models::courses::responses::LeaderboardEntry;
use crate::models::users::entities::UserSummary;

/// 比较成绩时的精度，百万分之一个百分点以内视为相同
const SCORE_SCALE: f64 = 1_000_000.0;

/// 一个学生在课程内的全部评分项目（百分制）
#[derive(Debug, Clone)]
pub struct StudentItems {
    pub student: UserSummary,
    pub percentages: Vec<f64>,
}

impl StudentItems {
    pub fn new(student: UserSummary) -> Self {
        Self {
            student,
            percentages: Vec::new(),
        }
    }

    pub fn performance(&self) -> Option<f64> {
        if self.percentages.is_empty() {
            return None;
        }
        Some(self.percentages.iter().sum::<f64>() / self.percentages.len() as f64)
    }
}

fn score_key(performance: f64) -> i64 {
    (performance * SCORE_SCALE).round() as i64
}

fn by_name_then_id(a: &UserSummary, b: &UserSummary) -> Ordering {
    a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id))
}

/// 保留两位小数，仅用于展示
pub fn round_for_display(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn rank_students(students: Vec<StudentItems>) -> Vec<LeaderboardEntry> {
    let mut ranked = Vec::new();
    let mut unranked = Vec::new();

    for items in students {
        let graded_items = items.percentages.len() as u32;
        match items.performance() {
            Some(performance) => ranked.push((items.student, performance, graded_items)),
            None => unranked.push(items.student),
        }
    }

    ranked.sort_by(|(a, pa, _), (b, pb, _)| {
        score_key(*pb)
            .cmp(&score_key(*pa))
            .then_with(|| by_name_then_id(a, b))
    });
    unranked.sort_by(by_name_then_id);

    let mut entries = Vec::with_capacity(ranked.len() + unranked.len());
    let mut previous: Option<(i64, u32)> = None;

    for (index, (student, performance, graded_items)) in ranked.into_iter().enumerate() {
        let key = score_key(performance);
        let rank = match previous {
            Some((prev_key, prev_rank)) if prev_key == key => prev_rank,
            _ => index as u32 + 1,
        };
        previous = Some((key, rank));

        entries.push(LeaderboardEntry {
            rank: Some(rank),
            student,
            performance: Some(round_for_display(performance)),
            graded_items,
        });
    }

    entries.extend(unranked.into_iter().map(|student| LeaderboardEntry {
        rank: None,
        student,
        performance: None,
        graded_items: 0,
    }));

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, name: &str, percentages: &[f64]) -> StudentItems {
        StudentItems {
            student: UserSummary {
                id,
                username: format!("user{id}"),
                display_name: name.to_string(),
                avatar_url: None,
            },
            percentages: percentages.to_vec(),
        }
    }

    #[test]
    fn test_competition_ranking_with_ties() {
        let entries = rank_students(vec![
            student(1, "Dan", &[70.0]),
            student(2, "Bea", &[90.0, 70.0]),
            student(3, "Amy", &[80.0]),
            student(4, "Cal", &[95.0]),
        ]);

        let ranks: Vec<_> = entries.iter().map(|e| (e.student.id, e.rank)).collect();
        // Amy 与 Bea 同为 80 分，按名字排序
        assert_eq!(
            ranks,
            vec![(4, Some(1)), (3, Some(2)), (2, Some(2)), (1, Some(4))]
        );
        assert_eq!(entries[2].graded_items, 2);
    }

    #[test]
    fn test_students_without_items_are_listed_last() {
        let entries = rank_students(vec![
            student(1, "Zed", &[]),
            student(2, "Ann", &[]),
            student(3, "Max", &[10.0]),
        ]);

        assert_eq!(entries[0].student.id, 3);
        assert_eq!(entries[0].rank, Some(1));
        assert_eq!(entries[1].student.id, 2);
        assert_eq!(entries[1].rank, None);
        assert_eq!(entries[2].student.id, 1);
        assert!(entries[2].performance.is_none());
    }

    #[test]
    fn test_near_equal_scores_share_rank_and_display_is_rounded() {
        let entries = rank_students(vec![
            student(1, "A", &[100.0, 0.0, 0.0]),
            student(2, "B", &[33.333_333_333_4]),
        ]);
        assert_eq!(entries[0].rank, Some(1));
        assert_eq!(entries[1].rank, Some(1));
        assert_eq!(entries[0].performance, Some(33.33));
    }

    #[test]
    fn test_same_name_orders_by_id() {
        let entries = rank_students(vec![student(9, "Kim", &[50.0]), student(5, "Kim", &[50.0])]);
        assert_eq!(entries[0].student.id, 5);
        assert_eq!(entries[1].student.id, 9);
    }
}
