//! 题目导航 - 业务能力层
//!
//! 维护当前筛选条件（主题 + 难度）和在筛选结果中的游标
//!
//! - 上一题 / 下一题首尾循环
//! - 筛选条件变化时游标归零
//! - 记录当前题目开始显示的时间

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::BusinessError;
use crate::models::Catalog;
use crate::services::submission_sink::elapsed_since;

/// 筛选条件；分析模式下没有难度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    pub topic: String,
    pub level: Option<String>,
}

/// 进度信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 从 1 开始
    pub position: usize,
    pub total: usize,
    pub fraction: f64,
}

/// 题目导航器
#[derive(Debug, Clone)]
pub struct Navigator {
    filter: Option<FilterKey>,
    view: Vec<usize>,
    cursor: usize,
    shown_at: DateTime<Local>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            filter: None,
            view: Vec::new(),
            cursor: 0,
            shown_at: Local::now(),
        }
    }

    /// 设置筛选条件并重新计算筛选结果
    ///
    /// 条件与上次不同则游标归零并重新计时；相同则保持游标不动
    ///
    /// # 返回
    /// 筛选条件是否发生变化
    pub fn set_filter(&mut self, catalog: &Catalog, topic: &str, level: Option<&str>) -> bool {
        self.view = catalog.matching_indices(topic, level);

        let key = FilterKey {
            topic: topic.to_string(),
            level: level.map(str::to_string),
        };
        let changed = self.filter.as_ref() != Some(&key);
        if changed {
            debug!("筛选条件变化: {:?} -> {:?}, 游标归零", self.filter, key);
            self.filter = Some(key);
            self.cursor = 0;
            self.restart_timer();
        }
        changed
    }

    /// 上一题，位于第一题时跳到最后一题
    pub fn previous(&mut self) {
        if self.view.is_empty() {
            return;
        }
        self.cursor = if self.cursor > 0 {
            self.cursor - 1
        } else {
            self.view.len() - 1
        };
        self.restart_timer();
    }

    /// 下一题，位于最后一题时回到第一题
    pub fn next(&mut self) {
        if self.view.is_empty() {
            return;
        }
        self.cursor = if self.cursor < self.view.len() - 1 {
            self.cursor + 1
        } else {
            0
        };
        self.restart_timer();
    }

    /// 直接跳到指定位置（滑块）
    ///
    /// 不重新计时：用时从上一次翻页算起
    pub fn jump_to(&mut self, position: usize) -> Result<(), BusinessError> {
        if self.view.is_empty() {
            return Ok(());
        }
        let max_index = self.view.len() - 1;
        if position > max_index {
            return Err(BusinessError::IndexOutOfRange {
                index: position,
                max_index,
            });
        }
        self.cursor = position;
        Ok(())
    }

    pub fn progress(&self) -> Option<Progress> {
        if self.view.is_empty() {
            return None;
        }
        let position = self.cursor + 1;
        let total = self.view.len();
        Some(Progress {
            position,
            total,
            fraction: position as f64 / total as f64,
        })
    }

    /// 游标所指的题目编号
    pub fn current_index(&self) -> Option<usize> {
        self.view.get(self.cursor).copied()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn filter(&self) -> Option<&FilterKey> {
        self.filter.as_ref()
    }

    pub fn shown_at(&self) -> DateTime<Local> {
        self.shown_at
    }

    /// 重新开始计时
    pub fn restart_timer(&mut self) {
        self.shown_at = Local::now();
    }

    /// 从开始显示到 `now` 经过的秒数，时钟回拨时为 0
    pub fn elapsed_seconds(&self, now: DateTime<Local>) -> f64 {
        elapsed_since(self.shown_at, now)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::fixtures::{item, tax_labor_catalog};
    use chrono::Duration;

    fn five_tax_items() -> Catalog {
        Catalog::new((0..5).map(|i| item("tax", "Remember", &format!("{}.pdf", i))).collect())
    }

    #[test]
    fn test_filter_selects_sorted_distinct_indices() {
        let catalog = Catalog::new(vec![
            item("tax", "Remember", "a.pdf"),
            item("tax", "Understand", "b.pdf"),
            item("labor", "Remember", "c.pdf"),
            item("tax", "Remember", "d.pdf"),
        ]);
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        assert_eq!(nav.view(), &[0, 3]);
        nav.set_filter(&catalog, "tax", None);
        assert_eq!(nav.view(), &[0, 1, 3]);
    }

    #[test]
    fn test_filter_change_resets_cursor_but_same_filter_keeps_it() {
        let catalog = five_tax_items();
        let mut nav = Navigator::new();
        assert!(nav.set_filter(&catalog, "tax", Some("Remember")));
        nav.next();
        nav.next();
        assert_eq!(nav.cursor(), 2);

        assert!(!nav.set_filter(&catalog, "tax", Some("Remember")));
        assert_eq!(nav.cursor(), 2);

        assert!(nav.set_filter(&catalog, "tax", Some("Understand")));
        assert_eq!(nav.cursor(), 0);

        nav.set_filter(&catalog, "tax", Some("Remember"));
        nav.next();
        assert!(nav.set_filter(&catalog, "labor", Some("Remember")));
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_next_then_previous_returns_to_interior_position() {
        let catalog = five_tax_items();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        for start in 1..4 {
            nav.jump_to(start).unwrap();
            nav.next();
            nav.previous();
            assert_eq!(nav.cursor(), start);
        }
    }

    #[test]
    fn test_wrap_around_both_ends() {
        let catalog = five_tax_items();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        nav.previous();
        assert_eq!(nav.cursor(), 4);
        nav.next();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_empty_view_navigation_is_noop() {
        let catalog = tax_labor_catalog();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "land", Some("Remember"));
        let shown_at = nav.shown_at();

        nav.next();
        nav.previous();
        nav.jump_to(3).unwrap();

        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.current_index(), None);
        assert_eq!(nav.progress(), None);
        assert_eq!(nav.shown_at(), shown_at);
    }

    #[test]
    fn test_jump_out_of_range_is_rejected() {
        let catalog = five_tax_items();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        nav.jump_to(2).unwrap();
        assert_eq!(
            nav.jump_to(5),
            Err(BusinessError::IndexOutOfRange {
                index: 5,
                max_index: 4
            })
        );
        assert_eq!(nav.cursor(), 2);
    }

    #[test]
    fn test_jump_keeps_timer_while_next_restarts_it() {
        let catalog = five_tax_items();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        let shown_at = nav.shown_at();

        nav.jump_to(3).unwrap();
        assert_eq!(nav.shown_at(), shown_at);

        nav.next();
        assert!(nav.shown_at() >= shown_at);
    }

    #[test]
    fn test_progress_bounds() {
        let catalog = five_tax_items();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        for _ in 0..7 {
            let progress = nav.progress().unwrap();
            assert!(progress.position >= 1 && progress.position <= progress.total);
            assert!(progress.fraction > 0.0 && progress.fraction <= 1.0);
            nav.next();
        }
        nav.jump_to(4).unwrap();
        let last = nav.progress().unwrap();
        assert_eq!((last.position, last.total), (5, 5));
        assert_eq!(last.fraction, 1.0);
    }

    #[test]
    fn test_elapsed_seconds_never_negative() {
        let nav = Navigator::new();
        let later = nav.shown_at() + Duration::milliseconds(1500);
        assert_eq!(nav.elapsed_seconds(later), 1.5);
        let earlier = nav.shown_at() - Duration::seconds(10);
        assert_eq!(nav.elapsed_seconds(earlier), 0.0);
    }

    #[test]
    fn test_three_row_catalog_walkthrough() {
        let catalog = tax_labor_catalog();
        let mut nav = Navigator::new();
        nav.set_filter(&catalog, "tax", Some("Remember"));
        assert_eq!(nav.view(), &[0, 2]);
        assert_eq!(nav.cursor(), 0);

        nav.next();
        assert_eq!(nav.cursor(), 1);
        assert_eq!(nav.current_index(), Some(2));

        nav.next();
        assert_eq!(nav.cursor(), 0);
    }
}
