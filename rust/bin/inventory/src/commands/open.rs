//! `inventory open`: run the shell in the terminal.
//!
//! Mounts the app into a terminal host, then reads one path per line
//! from stdin and navigates to it. Every committed route is printed as
//! `path<TAB>name<TAB>title`.

use std::sync::Arc;

use anyhow::Result;
use inventory_app::{App, Host, MountError};
use inventory_core::{AppConfig, LogNotifier};
use inventory_router::{Document, Router};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints the mounted route to stdout.
pub struct TerminalHost;

impl Host for TerminalHost {
    fn mount(&self, target: &str, router: &Router, document: &Document) -> Result<(), MountError> {
        println!("mounted {}", target);
        print_route(router, document);
        Ok(())
    }
}

fn print_route(router: &Router, document: &Document) {
    let route = router.current();
    println!("{}\t{}\t{}", route.path, route.label(), document.title());
}

pub async fn run(config: AppConfig, initial: &str) -> Result<()> {
    let app = App::builder(config)
        .notifier(Arc::new(LogNotifier))
        .build()?;
    app.run(initial, &TerminalHost).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let path = line.trim();
        if path.is_empty() {
            continue;
        }
        match app.navigate(path).await {
            Ok(_) => print_route(app.router(), app.document()),
            Err(e) => app.log().warn(format_args!("stayed on {}: {}", app.router().current().path, e)),
        }
    }
    Ok(())
}
