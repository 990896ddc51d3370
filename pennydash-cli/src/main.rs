//! PennyDash CLI: one-shot queries and a polling watch mode.
//!
//! Commands:
//! - `count`: total number of tracked stocks
//! - `summary`: headline numbers and top gainers
//! - `details`: one page of the stock table
//! - `show`: every field of one ticker
//! - `watch`: poll the summary on an interval

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;

use pennydash_core::api::{HttpPennyApi, PennyApi};
use pennydash_core::config::{DashConfig, SummaryPolicy};
use pennydash_core::domain::{StockDetailRow, StockSummary};
use pennydash_core::filter::RowFilter;
use pennydash_core::format;
use pennydash_core::orchestrator::{Applied, Orchestrator, OrchestratorSettings, ResourceKind};
use pennydash_core::paginate::{page_count, paginate};
use pennydash_core::selection::select_by_ticker;

#[derive(Parser)]
#[command(name = "pennydash", about = "PennyDash CLI: query the penny-stock backend")]
struct Cli {
    /// Config file (default: <config_dir>/pennydash/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the total number of tracked stocks.
    Count,
    /// Print headline numbers and top gainers.
    Summary {
        /// Print the raw response as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print one page of the stock details table.
    Details {
        /// Maximum rows to request from the backend (0 = no limit).
        #[arg(long)]
        limit: Option<u32>,

        /// Do not request Reddit comment summaries.
        #[arg(long, default_value_t = false)]
        no_comments: bool,

        /// Page to print (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page. Defaults to the configured page size.
        #[arg(long)]
        page_size: Option<usize>,

        /// Print the page as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print every field of one ticker.
    Show {
        /// Reddit ticker, e.g. ABCD.
        ticker: String,
    },
    /// Poll the summary and print each result.
    Watch {
        /// Seconds between polls. Defaults to the configured interval.
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many summaries.
        #[arg(long)]
        count: Option<usize>,
    },
}

/// Row filters applied before pagination.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive substring of the ticker or yfinance symbol.
    #[arg(long, default_value = "")]
    search: String,

    /// Exact sector name.
    #[arg(long)]
    sector: Option<String>,

    /// Exact country name.
    #[arg(long)]
    country: Option<String>,

    /// Lowest market cap to include, in dollars.
    #[arg(long)]
    min_market_cap: Option<f64>,

    /// Highest market cap to include, in dollars.
    #[arg(long)]
    max_market_cap: Option<f64>,
}

impl From<FilterArgs> for RowFilter {
    fn from(args: FilterArgs) -> Self {
        RowFilter {
            search: args.search,
            sector: args.sector,
            country: args.country,
            min_market_cap: args.min_market_cap,
            max_market_cap: args.max_market_cap,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(DashConfig::default_path);
    let mut config = DashConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(&config.log.level)).init();
    log::debug!("using backend {}", config.api.base_url);

    let api = HttpPennyApi::new(config.api.base_url.clone(), config.api.timeout())?;

    match cli.command {
        Commands::Count => run_count(&api),
        Commands::Summary { json } => run_summary(&api, json),
        Commands::Details {
            limit,
            no_comments,
            page,
            page_size,
            json,
            filter,
        } => {
            let limit = limit.or(config.details.limit()).filter(|l| *l > 0);
            let include_comments = config.details.include_comments && !no_comments;
            let page_size = page_size.unwrap_or(config.details.page_size);
            let query = DetailsQuery {
                limit,
                include_comments,
                page,
                page_size,
                filter: filter.into(),
            };
            run_details(&api, &query, json)
        }
        Commands::Show { ticker } => run_show(&api, &config, &ticker),
        Commands::Watch { interval, count } => {
            if let Some(secs) = interval {
                config.refresh.interval_secs = secs;
            }
            config.refresh.summary_policy = SummaryPolicy::Periodic;
            run_watch(&api, &config, count)
        }
    }
}

fn run_count(api: &dyn PennyApi) -> Result<ExitCode> {
    let count = api.fetch_count()?;
    println!("{}", count.total_stocks);
    Ok(ExitCode::SUCCESS)
}

fn run_summary(api: &dyn PennyApi, json: bool) -> Result<ExitCode> {
    let summary = api.fetch_summary()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(ExitCode::SUCCESS)
}

struct DetailsQuery {
    limit: Option<u32>,
    include_comments: bool,
    page: usize,
    page_size: usize,
    filter: RowFilter,
}

fn run_details(api: &dyn PennyApi, query: &DetailsQuery, json: bool) -> Result<ExitCode> {
    let details = api.fetch_details(query.limit, query.include_comments)?;
    let matching = query.filter.apply(&details.rows);
    let rows = paginate(&matching, query.page, query.page_size);

    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{:<8} {:<24} {:<18} {:>10} {:>9} {:>10} {:>9}",
        "Ticker", "Name", "Sector", "Price", "Change", "Mkt Cap", "Volume"
    );
    println!("{}", "-".repeat(94));
    for r in rows {
        println!(
            "{:<8} {:<24} {:<18} {:>10} {:>9} {:>10} {:>9}",
            format::truncate(&r.reddit_ticker, 8),
            format::truncate(&format::text(r.display_name()), 24),
            format::truncate(&format::text(r.sector.as_deref()), 18),
            format::price(r.current_price),
            format::percent(r.change_pct()),
            format::money(r.market_cap),
            format::compact(r.volume),
        );
    }
    println!();
    println!(
        "Page {} of {} ({} matching of {} stocks)",
        query.page.max(1),
        page_count(matching.len(), query.page_size),
        matching.len(),
        details.total_stocks
    );
    Ok(ExitCode::SUCCESS)
}

fn run_show(api: &dyn PennyApi, config: &DashConfig, ticker: &str) -> Result<ExitCode> {
    let details = api.fetch_details(config.details.limit(), config.details.include_comments)?;
    match select_by_ticker(&details.rows, ticker) {
        Some(row) => {
            print_row(row);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No details for ticker '{ticker}'.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_watch(api: &dyn PennyApi, config: &DashConfig, count: Option<usize>) -> Result<ExitCode> {
    let mut orch = Orchestrator::new(OrchestratorSettings::from_config(config));

    let mut printed = 0usize;
    let mut pending = orch.start(Instant::now());
    loop {
        for req in pending.drain(..) {
            // Only the summary is printed; the mount details request is never run.
            if req.resource() != ResourceKind::Summary {
                continue;
            }
            match orch.apply(req.execute(api)) {
                Applied::Updated(_) => {
                    if let Some(summary) = orch.summary().data() {
                        println!("[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                        print_summary(summary);
                        println!();
                    }
                    printed += 1;
                }
                Applied::Failed(_, err) => {
                    eprintln!("[{}] refresh failed: {err}", chrono::Local::now().format("%H:%M:%S"));
                    printed += 1;
                }
                Applied::Stale(_) => {}
            }
        }

        if count.is_some_and(|n| printed >= n) {
            orch.stop();
            return Ok(ExitCode::SUCCESS);
        }

        let Some(due) = orch.next_poll() else {
            return Ok(ExitCode::SUCCESS);
        };
        thread::sleep(due.saturating_duration_since(Instant::now()).max(Duration::from_millis(10)));
        pending.extend(orch.tick(Instant::now()));
    }
}

fn print_summary(summary: &StockSummary) {
    println!("Total stocks: {}", summary.total_stocks);
    println!("New today:    {}", summary.new_stocks_today);
    if summary.top_gainers.is_empty() {
        println!("Top gainers:  {}", format::PLACEHOLDER);
        return;
    }
    println!("Top gainers:");
    for g in &summary.top_gainers {
        println!(
            "  {:<8} {:>10} {:>9}",
            g.reddit_ticker,
            format::price(g.current_price),
            format::percent(g.change_pct)
        );
    }
}

fn print_row(r: &StockDetailRow) {
    let fields: [(&str, String); 24] = [
        ("Ticker", r.reddit_ticker.clone()),
        ("Symbol", format::text(r.yfinance_symbol.as_deref())),
        ("Name", format::text(r.display_name())),
        ("Sector", format::text(r.sector.as_deref())),
        ("Industry", format::text(r.industry.as_deref())),
        ("Country", format::text(r.country.as_deref())),
        ("Currency", format::text(r.currency.as_deref())),
        ("Website", format::text(r.website.as_deref())),
        ("Employees", format::integer(r.employees)),
        ("Founded", format::integer(r.founded)),
        ("Price", format::price(r.current_price)),
        ("Change", format::percent(r.change_pct())),
        ("Previous close", format::price(r.previous_close)),
        ("Open", format::price(r.open)),
        ("Day high", format::price(r.day_high)),
        ("Day low", format::price(r.day_low)),
        ("Volume", format::compact(r.volume)),
        ("Market cap", format::money(r.market_cap)),
        ("Score", format::integer(r.score)),
        ("Comments", format::integer(r.num_comments)),
        ("Posted", format::text(r.created_utc.as_deref())),
        ("Last updated", format::text(r.last_updated.as_deref())),
        ("Verdict", format::text(r.verdict.as_deref())),
        ("Backend error", format::text(r.error.as_deref())),
    ];
    for (label, value) in fields {
        println!("{label:>16}: {value}");
    }
    for (label, body) in [
        ("About", r.about.as_deref()),
        ("Post summary", r.summarized_content.as_deref()),
        ("Comment summary", r.summarized_comments.as_deref()),
    ] {
        println!();
        println!("{label}:");
        println!("  {}", format::text(body));
    }
}
