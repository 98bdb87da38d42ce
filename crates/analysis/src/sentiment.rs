use kawase_core::analysis::entity::{Direction, SentimentResult};
use kawase_core::config::ScoringConfig;
use kawase_core::market::entity::NewsArticle;

/// # Summary
/// 新闻情绪打分：对文章情绪得分取算术平均，经固定阈值映射为
/// 方向标签与点数贡献。
///
/// # Invariants
/// - 空文章集合是合法的低信息量状态，返回 {0.0, Neutral, 0, 0}。
///
/// # Arguments
/// * `articles`: 外部情绪源提供的已打分文章。
/// * `scoring`: 计分策略常量。
///
/// # Returns
/// 返回情绪打分结果 (该路径没有失败模式)。
pub fn score(articles: &[NewsArticle], scoring: &ScoringConfig) -> SentimentResult {
    if articles.is_empty() {
        return SentimentResult {
            average_score: 0.0,
            label: Direction::Neutral,
            points: 0,
            article_count: 0,
        };
    }

    let average_score =
        articles.iter().map(|a| a.score).sum::<f64>() / articles.len() as f64;

    let (label, points) = if average_score > scoring.sentiment_strong {
        (Direction::Buy, 3)
    } else if average_score > scoring.sentiment_weak {
        (Direction::Buy, 1)
    } else if average_score < -scoring.sentiment_strong {
        (Direction::Sell, 3)
    } else if average_score < -scoring.sentiment_weak {
        (Direction::Sell, 1)
    } else {
        (Direction::Neutral, 0)
    };

    SentimentResult {
        average_score,
        label,
        points,
        article_count: articles.len(),
    }
}
