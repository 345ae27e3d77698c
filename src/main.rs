use clap::Parser;
use film_scores::adapters::http::{build_client, HttpFetcher};
use film_scores::adapters::page_source::load_page;
use film_scores::core::message::{self, ScoresResponse};
use film_scores::core::page_reader::read_movie_info_now;
use film_scores::domain::ports::Presenter;
use film_scores::utils::{logger, validation::Validate};
use film_scores::{
    build_dispatcher, CliConfig, MovieQuery, ScoreController, ScoutError, TextPresenter,
    TomlConfig, ViewState,
};

fn exit_with(e: &ScoutError) -> ! {
    tracing::error!("❌ {} (category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn resolve_query(cli: &CliConfig, config: &TomlConfig) -> Result<Option<MovieQuery>, ScoutError> {
    if let Some(query) = cli.direct_query() {
        return Ok(Some(query));
    }

    let Some(page) = &cli.page else {
        return Ok(None);
    };

    // 主機頁面不經過 relay
    let fetcher = HttpFetcher::new(build_client(config)?);
    let html = load_page(page, &fetcher).await?;
    let mut query = read_movie_info_now(&html);

    if let (Some(query), Some(year)) = (query.as_mut(), &cli.year) {
        query.year = Some(year.clone());
    }
    Ok(query)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.is_serve() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Resolved config: {:?}", config);

    let dispatcher = match build_dispatcher(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => exit_with(&e),
    };

    if cli.is_serve() {
        tracing::info!("Serving getScores requests on stdin");
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        message::serve(&dispatcher, stdin, tokio::io::stdout()).await?;
        return Ok(());
    }

    let query = match resolve_query(&cli, &config).await {
        Ok(query) => query,
        Err(e) => exit_with(&e),
    };

    let presenter = TextPresenter;
    if !cli.json {
        eprintln!("{}", presenter.render(&ViewState::Loading, query.as_ref()));
    }

    let controller = ScoreController::new(dispatcher);
    let state = controller
        .trigger(query.clone())
        .await
        .unwrap_or(ViewState::Idle);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ScoresResponse::from_state(&state))?
        );
    } else {
        println!("{}", presenter.render(&state, query.as_ref()));
    }

    // 根據結果決定退出碼
    match (&state, &query) {
        (ViewState::Error(_), None) => std::process::exit(ScoutError::MissingTitle.exit_code()),
        (ViewState::Error(_), Some(_)) => std::process::exit(2),
        _ => Ok(()),
    }
}
