//! Query router - maps a free-text question onto one of the aggregate views
//!
//! Routing is keyword based and checked in a fixed order:
//!
//! | keyword(s)            | intent                | visualization |
//! |-----------------------|-----------------------|---------------|
//! | `category`            | `revenue_by_category` | `bar_chart`   |
//! | `month`, `trend`      | `monthly_revenue`     | `line_chart`  |
//! | `customer`, `gender`  | `customer_segments`   | `stacked_bar` |
//!
//! A recognized question gets a context block from its table, which is sent
//! to the summarizer. If the summarizer fails for any reason, the intent's
//! precomputed fallback sentence is used instead. Unrecognized questions are
//! answered with a hint and never reach the summarizer.

use tracing::{info, warn};

use crate::ai::Summarizer;
use crate::aggregate::Datasets;
use crate::error::{Error, Result};
use crate::insights::top_category;
use crate::models::{
    CategoryRevenue, CustomerSegment, InsightSource, Intent, QueryNotUnderstood, QueryResponse,
    QueryResult, Visualization,
};

/// Number of segment rows included in the context block
pub const SEGMENT_CONTEXT_ROWS: usize = 5;

const MONTHLY_FALLBACK: &str = "Revenue shows a stable month-over-month trend, \
suggesting consistent business performance.";

const SEGMENTS_FALLBACK: &str = "Customer segmentation highlights differences in spending \
behavior, which can be leveraged for targeted marketing.";

/// Everything needed to answer a recognized question
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    /// Data snippet sent to the summarizer
    pub context: String,
    /// Sentence used when the summarizer fails
    pub fallback: String,
    pub visualization: Visualization,
}

/// Pick the intent for a question, or `None` if no keyword matches
pub fn detect_intent(question: &str) -> Option<Intent> {
    let q = question.to_lowercase();

    if q.contains("category") {
        Some(Intent::RevenueByCategory)
    } else if q.contains("month") || q.contains("trend") {
        Some(Intent::MonthlyRevenue)
    } else if q.contains("customer") || q.contains("gender") {
        Some(Intent::CustomerSegments)
    } else {
        None
    }
}

/// Context and fallback for the top-earning category
pub fn analyze_revenue_by_category(rows: &[CategoryRevenue]) -> Option<QueryContext> {
    let top = top_category(rows)?;

    Some(QueryContext {
        context: format!(
            "Category: {}\nRevenue: {}",
            top.category, top.total_amount
        ),
        fallback: format!(
            "{} is the highest revenue-generating category, indicating strong product-market fit.",
            top.category
        ),
        visualization: Visualization::BarChart,
    })
}

/// Build the context block for an intent from the current aggregates
pub fn build_context(intent: Intent, datasets: &Datasets) -> Result<QueryContext> {
    match intent {
        Intent::RevenueByCategory => analyze_revenue_by_category(&datasets.revenue_by_category)
            .ok_or_else(|| Error::InvalidData("Category revenue table is empty".into())),
        Intent::MonthlyRevenue => {
            let latest = datasets
                .monthly_revenue
                .last()
                .ok_or_else(|| Error::InvalidData("Monthly revenue table is empty".into()))?;
            Ok(QueryContext {
                context: format!("Month: {}\nRevenue: {}", latest.month, latest.total_amount),
                fallback: MONTHLY_FALLBACK.to_string(),
                visualization: Visualization::LineChart,
            })
        }
        Intent::CustomerSegments => {
            if datasets.customer_segments.is_empty() {
                return Err(Error::InvalidData("Customer segment table is empty".into()));
            }
            let head = &datasets.customer_segments
                [..datasets.customer_segments.len().min(SEGMENT_CONTEXT_ROWS)];
            Ok(QueryContext {
                context: render_segments(head),
                fallback: SEGMENTS_FALLBACK.to_string(),
                visualization: Visualization::StackedBar,
            })
        }
    }
}

/// Render segment rows as a right-aligned text table
pub fn render_segments(rows: &[CustomerSegment]) -> String {
    let headers = ["Gender", "Product Category", "Total Amount"];
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|r| {
            [
                r.gender.clone(),
                r.category.clone(),
                r.total_amount.to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let format_row = |row: [&str; 3]| {
        row.iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:>w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut lines = vec![format_row(headers)];
    lines.extend(
        cells
            .iter()
            .map(|r| format_row([r[0].as_str(), r[1].as_str(), r[2].as_str()])),
    );
    lines.join("\n")
}

/// Prompt sent to the summarizer for a context block
pub fn build_prompt(context: &str) -> String {
    format!(
        "You are a senior business analyst.\n\
\n\
Given the data below, write ONE concise executive-level insight.\n\
Do NOT repeat the numbers.\n\
Focus on implications and decisions.\n\
\n\
DATA:\n\
{}\n\
\n\
INSIGHT:\n",
        context
    )
}

/// Route a question, ask the summarizer, and fall back on failure
///
/// Only an empty aggregate table is an error; summarizer failures are always
/// absorbed into the fallback sentence.
pub async fn answer_question<S>(
    question: &str,
    datasets: &Datasets,
    summarizer: &S,
) -> Result<QueryResponse>
where
    S: Summarizer + ?Sized,
{
    let Some(intent) = detect_intent(question) else {
        info!(question = %question, "Query not understood");
        return Ok(QueryResponse::NotUnderstood(QueryNotUnderstood::default()));
    };

    let ctx = build_context(intent, datasets)?;
    info!(intent = %intent, model = summarizer.model(), "Routing query");

    let (insight, source) = match summarizer.summarize(&build_prompt(&ctx.context)).await {
        Ok(text) => (text, InsightSource::Huggingface),
        Err(failure) => {
            warn!(intent = %intent, reason = %failure, "Summarizer failed, using fallback insight");
            (ctx.fallback, InsightSource::Fallback)
        }
    };

    info!(
        intent = %intent,
        source = %source,
        visualization = %ctx.visualization,
        "Query answered"
    );

    Ok(QueryResponse::Answered(QueryResult {
        question: question.to_string(),
        intent,
        insight,
        recommended_visualization: ctx.visualization,
        source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockBackend, SummaryFailure};
    use crate::models::MonthlyRevenue;

    fn datasets() -> Datasets {
        let segment = |gender: &str, category: &str, amount: f64| CustomerSegment {
            gender: gender.to_string(),
            category: category.to_string(),
            total_amount: amount,
        };
        Datasets {
            revenue_by_category: vec![
                CategoryRevenue {
                    category: "Electronics".to_string(),
                    total_amount: 500.0,
                },
                CategoryRevenue {
                    category: "Clothing".to_string(),
                    total_amount: 1200.0,
                },
            ],
            monthly_revenue: vec![
                MonthlyRevenue {
                    month: "2023-01".to_string(),
                    total_amount: 1000.0,
                },
                MonthlyRevenue {
                    month: "2023-06".to_string(),
                    total_amount: 1070.0,
                },
            ],
            customer_segments: vec![
                segment("Female", "Beauty", 300.0),
                segment("Female", "Clothing", 800.0),
                segment("Female", "Electronics", 200.0),
                segment("Male", "Beauty", 100.0),
                segment("Male", "Clothing", 400.0),
                segment("Male", "Electronics", 300.0),
            ],
        }
    }

    fn answered(response: QueryResponse) -> QueryResult {
        match response {
            QueryResponse::Answered(result) => result,
            QueryResponse::NotUnderstood(p) => panic!("not understood: {:?}", p),
        }
    }

    #[test]
    fn test_detect_intent_priority() {
        assert_eq!(
            detect_intent("Which CATEGORY grew each month?"),
            Some(Intent::RevenueByCategory)
        );
        assert_eq!(
            detect_intent("What is the monthly trend?"),
            Some(Intent::MonthlyRevenue)
        );
        assert_eq!(
            detect_intent("trend by gender"),
            Some(Intent::MonthlyRevenue)
        );
        assert_eq!(
            detect_intent("How do customers differ?"),
            Some(Intent::CustomerSegments)
        );
        assert_eq!(
            detect_intent("Spending by Gender"),
            Some(Intent::CustomerSegments)
        );
        assert_eq!(detect_intent("what is the weather"), None);
        assert_eq!(detect_intent(""), None);
    }

    #[test]
    fn test_category_context_uses_top_category() {
        let ctx = analyze_revenue_by_category(&datasets().revenue_by_category).unwrap();
        assert_eq!(ctx.context, "Category: Clothing\nRevenue: 1200");
        assert!(ctx.fallback.starts_with("Clothing is the highest revenue-generating category"));
        assert_eq!(ctx.visualization, Visualization::BarChart);
        assert!(analyze_revenue_by_category(&[]).is_none());
    }

    #[test]
    fn test_monthly_context_uses_latest_row() {
        let ctx = build_context(Intent::MonthlyRevenue, &datasets()).unwrap();
        assert_eq!(ctx.context, "Month: 2023-06\nRevenue: 1070");
        assert_eq!(ctx.fallback, MONTHLY_FALLBACK);
        assert_eq!(ctx.visualization, Visualization::LineChart);
    }

    #[test]
    fn test_segment_context_has_first_five_rows() {
        let ctx = build_context(Intent::CustomerSegments, &datasets()).unwrap();
        let lines: Vec<&str> = ctx.context.lines().collect();
        assert_eq!(lines.len(), 1 + SEGMENT_CONTEXT_ROWS);
        assert_eq!(lines[0], "Gender Product Category Total Amount");
        assert_eq!(lines[1], "Female           Beauty          300");
        assert!(lines[5].contains("Clothing"));
        assert!(!ctx.context.contains("Electronics          300"));
        assert_eq!(ctx.visualization, Visualization::StackedBar);
    }

    #[test]
    fn test_empty_table_is_invalid_data() {
        let empty = Datasets::default();
        for intent in [
            Intent::RevenueByCategory,
            Intent::MonthlyRevenue,
            Intent::CustomerSegments,
        ] {
            assert!(matches!(
                build_context(intent, &empty),
                Err(Error::InvalidData(_))
            ));
        }
    }

    #[test]
    fn test_prompt_wraps_context() {
        let prompt = build_prompt("Month: 2023-06\nRevenue: 1070");
        assert!(prompt.starts_with("You are a senior business analyst."));
        assert!(prompt.contains("Do NOT repeat the numbers."));
        assert!(prompt.contains("DATA:\nMonth: 2023-06\nRevenue: 1070\n"));
        assert!(prompt.ends_with("INSIGHT:\n"));
    }

    #[tokio::test]
    async fn test_answer_uses_generated_text() {
        let mock = MockBackend::replying("Clothing demand is the growth engine.");
        let result = answered(
            answer_question("Top category?", &datasets(), &mock)
                .await
                .unwrap(),
        );

        assert_eq!(result.question, "Top category?");
        assert_eq!(result.intent, Intent::RevenueByCategory);
        assert_eq!(result.insight, "Clothing demand is the growth engine.");
        assert_eq!(result.source, InsightSource::Huggingface);
        assert_eq!(result.recommended_visualization, Visualization::BarChart);
        assert!(mock
            .last_prompt()
            .unwrap()
            .contains("Category: Clothing"));
    }

    #[tokio::test]
    async fn test_every_failure_falls_back() {
        let failures = [
            SummaryFailure::Transport("connection refused".into()),
            SummaryFailure::Timeout,
            SummaryFailure::Status(503),
            SummaryFailure::UnexpectedShape("missing generated_text".into()),
        ];

        for failure in failures {
            let mock = MockBackend::failing(failure);
            let result = answered(
                answer_question("monthly revenue?", &datasets(), &mock)
                    .await
                    .unwrap(),
            );
            assert_eq!(result.source, InsightSource::Fallback);
            assert_eq!(result.insight, MONTHLY_FALLBACK);
            assert_eq!(result.intent, Intent::MonthlyRevenue);
            assert_eq!(mock.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_unrecognized_question_skips_summarizer() {
        let mock = MockBackend::default();
        let response = answer_question("what is the weather", &datasets(), &mock)
            .await
            .unwrap();

        assert_eq!(
            response,
            QueryResponse::NotUnderstood(QueryNotUnderstood::default())
        );
        assert_eq!(mock.call_count(), 0);
    }
}
