#![allow(dead_code)]

use async_trait::async_trait;
use paper_batch_review::error::ReviewError;
use paper_batch_review::{JobDescriptor, PaperData, ReviewResult, Reviewer};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 测试用评审协作者
///
/// - 标题在 `failing` 中的论文返回模拟的网络错误
/// - 标题为 `panic` 的论文直接 panic
/// - 记录调用次数与同时执行的最大数量
#[derive(Default)]
pub struct ScriptedReviewer {
    delay: Duration,
    failing: HashSet<String>,
    calls: AtomicUsize,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedReviewer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn failing<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing = titles.into_iter().map(Into::into).collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reviewer for ScriptedReviewer {
    async fn review(
        &self,
        paper: &PaperData,
        _output_dir: &Path,
    ) -> Result<ReviewResult, ReviewError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);

        let title = paper.title_or_unknown();
        if title == "panic" {
            panic!("reviewer crashed on {}", title);
        }
        if self.failing.contains(&title) {
            return Err(ReviewError::Other(format!(
                "simulated network error while reviewing {}",
                title
            )));
        }
        Ok(ReviewResult::new(title))
    }
}

/// 在 `papers_dir` 下为每个标题写一个论文文件（文件名与标题相同）
pub fn write_papers(papers_dir: &Path, titles: &[&str]) {
    std::fs::create_dir_all(papers_dir).unwrap();
    for title in titles {
        let json = format!(r#"{{"title": "{}", "code": []}}"#, title);
        std::fs::write(papers_dir.join(format!("{}.json", title)), json).unwrap();
    }
}

/// 写论文文件并生成对应的任务描述符
pub fn make_jobs(root: &Path, titles: &[&str]) -> Vec<JobDescriptor> {
    let papers_dir = root.join("papers");
    let output_dir = root.join("out");
    write_papers(&papers_dir, titles);
    titles
        .iter()
        .map(|t| JobDescriptor::new(papers_dir.join(format!("{}.json", t)), &output_dir))
        .collect()
}
