use film_scores::core::message::{self, ScoresResponse};
use film_scores::core::page_reader::read_movie_info;
use film_scores::{
    build_dispatcher, LetterboxdScore, MovieQuery, ScoreController, Site, TomlConfig, ViewState,
};
use httpmock::prelude::*;

fn config_for(rt: &MockServer, letterboxd: &MockServer) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.http.timeout_seconds = 5;
    config.site_mut(Site::RottenTomatoes).base_url = rt.base_url();
    config.site_mut(Site::Letterboxd).base_url = letterboxd.base_url();
    config
}

#[tokio::test]
async fn test_end_to_end_both_sites() {
    let rt = MockServer::start();
    let letterboxd = MockServer::start();

    let rt_search = rt.mock(|when, then| {
        when.method(GET).path("/search").query_param("search", "Arrival");
        then.status(200).body(
            r#"<search-page-media-row releaseyear="2016" tomatometerscore="94">
<a href="/m/arrival_2016" class="unset" data-qa="info-name">Arrival</a>
</search-page-media-row>"#,
        );
    });
    let rt_page = rt.mock(|when, then| {
        when.method(GET).path("/m/arrival_2016");
        then.status(200).body(
            r#"<rt-text slot="criticsScore">94%</rt-text>
<rt-text slot="audienceScore">82%</rt-text>"#,
        );
    });
    let lb_search = letterboxd.mock(|when, then| {
        when.method(GET).path("/search/films/Arrival/");
        then.status(200).body(
            r#"<ul class="results"><li><div class="film-poster" data-target-link="/film/arrival-2016/">
<span class="film-title-wrapper">Arrival <small class="metadata"><a href="/films/year/2016/">2016</a></small></span>
</div></li></ul>"#,
        );
    });
    let lb_page = letterboxd.mock(|when, then| {
        when.method(GET).path("/film/arrival-2016/");
        then.status(200)
            .body(r#"<meta name="twitter:data2" content="4.06 out of 5" />"#);
    });

    let dispatcher = build_dispatcher(&config_for(&rt, &letterboxd)).unwrap();
    let scores = dispatcher
        .dispatch(&MovieQuery::new("Arrival", Some("2016")))
        .await;

    rt_search.assert();
    rt_page.assert();
    lb_search.assert();
    lb_page.assert();

    let rt_scores = scores.rt.unwrap();
    assert_eq!(rt_scores.critics.as_deref(), Some("94%"));
    assert_eq!(rt_scores.audience.as_deref(), Some("82%"));
    assert_eq!(scores.letterboxd, Some(LetterboxdScore { rating: Some(4.06) }));
}

#[tokio::test]
async fn test_failed_search_reaches_normalized_slug() {
    let rt = MockServer::start();
    let letterboxd = MockServer::start();

    rt.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(503);
    });
    let slug_page = rt.mock(|when, then| {
        when.method(GET).path("/m/c_mon_c_mon");
        then.status(200).body(
            r#"<span data-testid="tomatometer-score">94%</span>
<span data-testid="popcornmeter-score">83%</span>"#,
        );
    });

    let dispatcher = build_dispatcher(&config_for(&rt, &letterboxd)).unwrap();
    let scores = dispatcher
        .dispatch(&MovieQuery::new("C'mon C'mon", Some("2021")))
        .await;

    slug_page.assert_hits(1);
    let rt_scores = scores.rt.unwrap();
    for value in [rt_scores.critics, rt_scores.audience] {
        let pct: u32 = value.unwrap().trim_end_matches('%').parse().unwrap();
        assert!((5..=100).contains(&pct));
    }
    assert!(scores.letterboxd.is_none());
}

#[tokio::test]
async fn test_one_site_down_still_reports_the_other() {
    let rt = MockServer::start();
    let letterboxd = MockServer::start();

    rt.mock(|when, then| {
        when.method(GET);
        then.status(500);
    });
    letterboxd.mock(|when, then| {
        when.method(GET).path("/film/heat-1995/");
        then.status(200)
            .body(r#"<script type="application/ld+json">{"aggregateRating":{"ratingValue":4.27}}</script>"#);
    });

    let controller = ScoreController::new(build_dispatcher(&config_for(&rt, &letterboxd)).unwrap());
    let state = controller
        .trigger(Some(MovieQuery::new("Heat", Some("1995"))))
        .await
        .unwrap();

    match state {
        ViewState::PartialSuccess(scores) => {
            assert!(scores.rt.is_none());
            assert_eq!(scores.letterboxd.unwrap().rating, Some(4.27));
        }
        other => panic!("expected partial success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_letterboxd_through_relay() {
    let rt = MockServer::start();
    let letterboxd = MockServer::start();
    let relay = MockServer::start();

    let film_url = format!("{}/film/heat/", letterboxd.base_url());
    let relayed = relay.mock(|when, then| {
        when.method(GET).path("/raw").query_param("url", film_url.as_str());
        then.status(200)
            .body(r#"<meta name="twitter:data2" content="4.30 out of 5">"#);
    });

    let mut config = config_for(&rt, &letterboxd);
    config.site_mut(Site::RottenTomatoes).enabled = false;
    config.site_mut(Site::Letterboxd).relay = Some(relay.url("/raw?url="));

    let dispatcher = build_dispatcher(&config).unwrap();
    let scores = dispatcher
        .dispatch(&MovieQuery::new("Heat", None::<String>))
        .await;

    relayed.assert();
    assert_eq!(scores.letterboxd, Some(LetterboxdScore { rating: Some(4.3) }));
    assert!(scores.rt.is_none());
}

#[tokio::test]
async fn test_serve_round_trip_with_page_reader_query() {
    let rt = MockServer::start();
    let letterboxd = MockServer::start();

    rt.mock(|when, then| {
        when.method(GET).path("/m/paris_texas");
        then.status(200).body(r#"<script>{"tomatometer": 95, "audience": 93}</script>"#);
    });

    let host_page = r#"<html><body><h3 class="product-title">Paris, Texas</h3></body></html>"#;
    let query = read_movie_info(host_page, 2025).unwrap();
    assert_eq!(query, MovieQuery::new("Paris, Texas", None::<String>));

    let request = serde_json::json!({"action": "getScores", "title": query.title, "year": query.year});
    let input = format!("{}\n", request);
    let mut output = Vec::new();

    let dispatcher = build_dispatcher(&config_for(&rt, &letterboxd)).unwrap();
    message::serve(&dispatcher, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let response: ScoresResponse = serde_json::from_slice(&output).unwrap();
    assert!(response.success);
    let rt_scores = response.scores.unwrap().rt.unwrap();
    assert_eq!(rt_scores.critics.as_deref(), Some("95%"));
    assert_eq!(rt_scores.audience.as_deref(), Some("93%"));
}

#[tokio::test]
async fn test_unknown_movie_is_total_failure() {
    let rt = MockServer::start();
    let letterboxd = MockServer::start();

    let controller = ScoreController::new(build_dispatcher(&config_for(&rt, &letterboxd)).unwrap());
    let state = controller
        .trigger(Some(MovieQuery::new("Zzyzx Qwerty", None::<String>)))
        .await
        .unwrap();

    assert_eq!(
        state,
        ViewState::Error("No scores found for Zzyzx Qwerty".to_string())
    );
}
