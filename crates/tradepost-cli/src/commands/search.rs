use anyhow::Result;
use tradepost_application::SearchFilterEngine;
use tradepost_core::navigation::AddressBar;
use tradepost_core::search::{SearchParams, SearchResultSet, keys};

use super::listing_line;
use crate::SearchArgs;
use crate::bootstrap::App;

pub async fn run(app: &App, args: SearchArgs) -> Result<()> {
    let (engine, address_bar) = app.search(args.from_url.as_deref().unwrap_or_default());
    let result_set = execute(&engine, args).await?;

    let query = address_bar.query();
    if !query.is_empty() {
        println!("🔎 ?{}", query);
    }
    println!("{} result(s)", result_set.total);
    for listing in &result_set.results {
        println!("  {}", listing_line(listing));
    }
    Ok(())
}

/// Drives the engine the way the search page does: enter the context first,
/// then hydrate from the URL or apply the explicit filters.
async fn execute(engine: &SearchFilterEngine, args: SearchArgs) -> Result<SearchResultSet> {
    let skill_context = args.context.skill_context().or_else(|| {
        args.from_url
            .as_deref()
            .map(SearchParams::parse)
            .and_then(|params| params.get(keys::IS_SKILL_SHARING)?.parse::<bool>().ok())
    });

    let context_results = match skill_context {
        Some(skill_context) => Some(engine.reset_search_context(skill_context).await?),
        None => None,
    };

    if args.from_url.is_some() {
        return Ok(match engine.apply_url_filters().await? {
            Some(result_set) => result_set,
            None => match context_results {
                Some(result_set) => result_set,
                None => engine.perform_search(false).await?,
            },
        });
    }

    if let Some(query) = args.query {
        engine.set_query(query);
    }
    if let Some(category_id) = args.category {
        engine.set_category(category_id);
    }
    if let Some(condition) = args.condition {
        engine.set_condition(condition);
    }
    if let Some(min_price) = args.min_price {
        engine.set_min_price(min_price);
    }
    if let Some(max_price) = args.max_price {
        engine.set_max_price(max_price);
    }
    Ok(engine.perform_search(true).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextArgs;
    use std::sync::Arc;
    use std::time::Duration;
    use tradepost_infrastructure::{HttpTransport, MemoryAddressBar};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine_for(server: &MockServer, url: &str) -> SearchFilterEngine {
        let transport =
            Arc::new(HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap());
        SearchFilterEngine::new(transport, Arc::new(MemoryAddressBar::new(url)))
    }

    fn empty_results() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [], "total": 0 }))
    }

    #[tokio::test]
    async fn test_from_url_context_flag_enters_skill_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("is_skill_sharing", "true"))
            .respond_with(empty_results())
            .expect(1)
            .mount(&server)
            .await;

        let url = "is_skill_sharing=true";
        let engine = engine_for(&server, url);
        let args = SearchArgs {
            from_url: Some(url.to_string()),
            ..SearchArgs::default()
        };

        execute(&engine, args).await.unwrap();

        assert_eq!(engine.state().filters().skill_context, Some(true));
    }

    #[tokio::test]
    async fn test_skills_flag_resets_before_url_hydration() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(empty_results())
            .expect(2)
            .mount(&server)
            .await;

        let url = "q=tutor&item_condition=good";
        let engine = engine_for(&server, url);
        let args = SearchArgs {
            from_url: Some(url.to_string()),
            context: ContextArgs {
                skills: true,
                items: false,
            },
            ..SearchArgs::default()
        };

        execute(&engine, args).await.unwrap();

        let filters = engine.state().filters().clone();
        assert_eq!(filters.skill_context, Some(true));
        assert_eq!(filters.query, "tutor");
        assert!(filters.condition.is_empty(), "item filters stay off for skills");
    }
}
