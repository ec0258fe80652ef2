use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use stockdesk::api::HttpApi;
use stockdesk::logging::{log, obj, v_str, Domain, Level};
use stockdesk::page::{LossAveragingPage, PortfolioPage, PredictionPage, SentimentPage};
use stockdesk::state::Config;
use stockdesk::view::{flatten, write_images, Node};

const USAGE: &str = "\
commands:
  portfolio <symbols,comma-separated> <investment>
  loss <symbol> <avg_price> <num_shares> <invest_amount>
  predict <symbol>
  sentiment <symbol>
  reset <portfolio|loss|predict|sentiment>
  help | quit";

fn show(nodes: &[Node]) {
    for line in flatten(nodes) {
        println!("{}", line);
    }
}

fn save_graphs(nodes: &[Node], dir: &str) {
    match write_images(nodes, Path::new(dir)) {
        Ok(paths) => {
            for path in paths {
                println!("graph saved: {}", path.display());
            }
        }
        Err(err) => eprintln!("could not save graphs: {}", err),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[("backend", v_str(&cfg.backend_base))]),
    );

    let api = HttpApi::new(&cfg);
    let mut portfolio = PortfolioPage::new();
    let mut loss = LossAveragingPage::new();
    let mut prediction = PredictionPage::new();
    let mut sentiment = SentimentPage::new();

    println!("stockdesk — backend {}", cfg.backend_base);
    println!("{}", USAGE);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => println!("{}", USAGE),
            ["portfolio", stocks, investment] => {
                portfolio.stocks = stocks.to_string();
                portfolio.investment = investment.to_string();
                portfolio.submit(&api).await;
                show(&portfolio.view());
            }
            ["loss", symbol, avg_price, num_shares, invest_amount] => {
                loss.stock_symbol = symbol.to_string();
                loss.avg_price = avg_price.to_string();
                loss.num_shares = num_shares.to_string();
                loss.invest_amount = invest_amount.to_string();
                loss.submit(&api).await;
                show(&loss.view());
            }
            ["predict", symbol] => {
                prediction.symbol = symbol.to_string();
                prediction.submit(&api).await;
                let nodes = prediction.view();
                show(&nodes);
                save_graphs(&nodes, &cfg.image_dir);
            }
            // Bare `sentiment` mirrors the empty-symbol no-op on that page.
            ["sentiment"] => {
                sentiment.stock_symbol.clear();
                sentiment.submit(&api).await;
                show(&sentiment.view());
            }
            ["sentiment", symbol] => {
                sentiment.stock_symbol = symbol.to_string();
                sentiment.submit(&api).await;
                show(&sentiment.view());
            }
            ["reset", which] => match *which {
                "portfolio" => portfolio.reset(),
                "loss" => loss.reset(),
                "predict" => prediction.reset(),
                "sentiment" => sentiment.reset(),
                _ => println!("unknown page: {}", which),
            },
            _ => println!("{}", USAGE),
        }
    }

    log(Level::Info, Domain::System, "shutdown", obj(&[]));
    Ok(())
}
