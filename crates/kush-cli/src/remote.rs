#![forbid(unsafe_code)]

//! Contact form submission and remote likes, performed against a live
//! storefront.

use std::io::Write;

use clap::Args;
use kush_core::{ContactForm, MemoryStorage, PageSnapshot};
use kush_runtime::{Effect, NoticeKind, PageEvent, StoreConfig};
use serde_json::json;

use crate::error::{CliError, Result};
use crate::session::Session;
use crate::transport::Transport;
use crate::util::write_json_line;

#[derive(Debug, Clone, Args)]
pub struct RemoteArgs {
    /// Origin the relative endpoints resolve against, e.g. `https://shop.example/`.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Value for the CSRF header.
    #[arg(long)]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub message: String,

    /// Contact endpoint; overrides the configured one. Without either the
    /// mail fallback link is printed.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[derive(Debug, Clone, Args)]
pub struct LikeArgs {
    pub product_id: u64,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

fn session(config: StoreConfig, remote: RemoteArgs) -> Result<Session<MemoryStorage>> {
    let transport = Transport::new(remote.base_url.as_deref())?;
    let mut session = Session::new(config, MemoryStorage::new(), transport);
    session.load(PageSnapshot::default(), false, remote.csrf_token);
    Ok(session)
}

/// The first notice among `effects`, as a result: success and info pass,
/// warnings and errors fail.
fn notice_outcome(effects: &[Effect]) -> Option<Result<String>> {
    effects.iter().find_map(|effect| match effect {
        Effect::ShowNotice { notice } => Some(match notice.kind {
            NoticeKind::Success | NoticeKind::Info => Ok(notice.text.clone()),
            NoticeKind::Warning | NoticeKind::Error => Err(CliError::exit(1, notice.text.clone())),
        }),
        _ => None,
    })
}

pub fn run_contact(args: ContactArgs, mut config: StoreConfig, out: &mut dyn Write) -> Result<()> {
    if let Some(endpoint) = args.endpoint {
        config.contact.endpoint = Some(endpoint);
    }
    let mut session = session(config, args.remote)?;
    let effects = session.dispatch(PageEvent::ContactSubmitted {
        form: ContactForm {
            name: args.name,
            email: args.email,
            phone: args.phone,
            message: args.message,
        },
    });

    if let Some(url) = effects.iter().find_map(|effect| match effect {
        Effect::Navigate { url } => Some(url),
        _ => None,
    }) {
        return write_json_line(out, &json!({ "sent": false, "mailto": url }));
    }
    match notice_outcome(&effects) {
        Some(Ok(message)) => write_json_line(out, &json!({ "sent": true, "message": message })),
        Some(Err(err)) => Err(err),
        None => Err(CliError::exit(1, "contact submission produced no reply")),
    }
}

pub fn run_like(args: LikeArgs, config: StoreConfig, out: &mut dyn Write) -> Result<()> {
    let mut session = session(config, args.remote)?;
    let effects = session.dispatch(PageEvent::RemoteLikeClicked {
        product_id: args.product_id,
    });

    if let Some(likes) = effects.iter().find_map(|effect| match effect {
        Effect::ShowRemoteLikes { likes, .. } => Some(*likes),
        _ => None,
    }) {
        return write_json_line(out, &json!({ "product_id": args.product_id, "likes": likes }));
    }
    match notice_outcome(&effects) {
        Some(Err(err)) => Err(err),
        _ => Err(CliError::exit(1, "like produced no count")),
    }
}
