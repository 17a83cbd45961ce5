use std::collections::HashSet;

use briefing_core::calendar::{format_date, format_generated_at, is_weekend, last_trading_day};
use briefing_core::config::{LimitUpConfig, NewsCategory};
use briefing_core::sectors::sector_order;
use briefing_core::{Briefing, BriefingConfig, Headline, LimitUpPick, NewsSection, Sectors};
use chrono::{DateTime, FixedOffset};
use tracing::{debug, info};

use crate::heuristics::{
    LIMIT_UP, extract_name_from_body, extract_names_from_title, extract_reason_from_title,
};
use crate::source::HeadlineSource;

const WEEKEND_NOTE: &str = "금요일 장 기준 브리핑입니다.";

/// Assemble the whole briefing for a run started at `now`.
pub async fn build_briefing<S: HeadlineSource + ?Sized>(
    source: &S,
    config: &BriefingConfig,
    sectors: Sectors,
    now: DateTime<FixedOffset>,
) -> Briefing {
    let news = build_news_section(
        source,
        &config.news.categories,
        config.news.max_headlines_per_category,
    )
    .await;
    let limit_up = collect_limit_up(source, &config.limit_up).await;
    let weekend_note = if is_weekend(&now) { WEEKEND_NOTE } else { "" };

    Briefing {
        generated_at: format_generated_at(&now),
        date: format_date(now.date_naive()),
        last_trading_day: format_date(last_trading_day(&now)),
        weekend_note: weekend_note.to_string(),
        news,
        limit_up,
        sector_order: sector_order(&sectors),
        sectors,
    }
}

/// Top headlines for each category, in the order the categories are given.
pub async fn build_news_section<S: HeadlineSource + ?Sized>(
    source: &S,
    categories: &[NewsCategory],
    max_per_category: usize,
) -> NewsSection {
    let mut section = NewsSection::new();
    for category in categories {
        let items = source.search(&category.query, max_per_category).await;
        info!(category = %category.key, count = items.len(), "news category");
        section.insert(category.key.clone(), items);
    }
    section
}

/// Guess today's limit-up stocks from `상한가` search results.
///
/// Titles repeated across queries are considered once. Each name is emitted
/// at most once, with the reason guessed from the first title naming it.
/// The limit is checked after a pick is added and after each headline, so a
/// `max_picks` of 0 still lets the first name through.
pub async fn collect_limit_up<S: HeadlineSource + ?Sized>(
    source: &S,
    config: &LimitUpConfig,
) -> Vec<LimitUpPick> {
    let entries = gather_limit_up_headlines(source, &config.queries, config.items_per_query).await;
    debug!(count = entries.len(), "limit-up headlines");

    let mut picks = Vec::new();
    let mut seen_names = HashSet::new();

    for entry in &entries {
        let mut names = extract_names_from_title(&entry.title);
        if names.is_empty() && config.article_fallback {
            let body = source.article_text(&entry.url).await;
            names.extend(extract_name_from_body(&body));
        }
        let reason = extract_reason_from_title(&entry.title);

        for name in names {
            if !seen_names.insert(name.clone()) {
                continue;
            }
            picks.push(LimitUpPick::new(name, reason.clone()));
            if picks.len() >= config.max_picks {
                break;
            }
        }
        if picks.len() >= config.max_picks {
            break;
        }
    }

    info!(count = picks.len(), "limit-up picks");
    picks
}

async fn gather_limit_up_headlines<S: HeadlineSource + ?Sized>(
    source: &S,
    queries: &[String],
    per_query: usize,
) -> Vec<Headline> {
    let mut entries = Vec::new();
    let mut seen_titles = HashSet::new();

    for query in queries {
        for item in source.search(query, per_query).await {
            if !seen_titles.insert(item.title.clone()) {
                continue;
            }
            if item.title.contains(LIMIT_UP) {
                entries.push(item);
            }
        }
    }
    entries
}
