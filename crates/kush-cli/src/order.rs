#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use kush_core::order::OrderDetails;
use kush_core::{Availability, MemoryStorage};
use kush_runtime::{Effect, PageEvent, StoreConfig};

use crate::error::{CliError, Result};
use crate::session::Session;
use crate::transport::Transport;
use crate::util::{read_optional_page, write_json_line};

#[derive(Debug, Clone, Args)]
pub struct OrderLinkArgs {
    #[arg(long)]
    pub product: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// `available` or `sold`.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Availability>,

    /// Anchor of the product on the landing page, for the deep link.
    #[arg(long)]
    pub anchor: Option<String>,

    /// Page snapshot used to fill in details the flags leave out.
    #[arg(long)]
    pub page: Option<PathBuf>,

    /// Print only the URL.
    #[arg(long)]
    pub url_only: bool,
}

fn parse_status(raw: &str) -> std::result::Result<Availability, String> {
    Availability::parse(raw).ok_or_else(|| format!("unknown status {raw:?} (expected available or sold)"))
}

pub fn run_order_link(args: OrderLinkArgs, config: StoreConfig, out: &mut dyn Write) -> Result<()> {
    let page = read_optional_page(args.page.as_deref())?;
    let mut session = Session::new(config, MemoryStorage::new(), Transport::new(None)?);
    session.load(page, false, None);

    let effects = session.dispatch(PageEvent::OrderClicked {
        details: OrderDetails {
            product: args.product,
            category: args.category,
            status: args.status,
            anchor: args.anchor,
        },
    });
    let link = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::OpenOrder { link } => Some(link),
            _ => None,
        })
        .ok_or_else(|| CliError::exit(1, "no order link produced"))?;

    if args.url_only {
        writeln!(out, "{}", link.url)?;
        Ok(())
    } else {
        write_json_line(out, &link)
    }
}
