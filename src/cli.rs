// IPS Console - Command Line
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Command-line surface: watch views and run one-shot actions.

use std::future::Future;
use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::actions::{ActionOutcome, DeletionTarget, RuleActionCoordinator};
use crate::api::{Gateway, HttpGateway};
use crate::config::Settings;
use crate::error::{ApiError, Field};
use crate::form::{ConfigForm, SAVED_MESSAGE};
use crate::models::{AddressStatus, LockKind, ServiceId};
use crate::polling::{PollEvent, PollingScheduler, Refresh, RefreshHandle};
use crate::views::{
    blocked_list, service_list, static_list, DynamicBlockList, IpRuleListView, RowAction,
    ServiceCard, ServiceListView, StaticRuleList,
};

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Backend API root for this run (overrides the saved setting)
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// Seconds between refreshes for this run
    #[arg(long, global = true)]
    pub interval: Option<u32>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the service dashboard
    Services(WatchArgs),
    /// Watch blocked IPs and static rules of a service
    Ips {
        service: ServiceId,
        #[command(flatten)]
        watch: WatchArgs,
    },
    /// Block an address for a service
    Block(AddressArgs),
    /// Release an address (removes its blacklist rule if it has one)
    Unblock(AddressArgs),
    /// Always allow an address
    Whitelist(AddressArgs),
    /// Always deny an address
    Blacklist(AddressArgs),
    /// Remove the static rule of an address
    RemoveRule(AddressArgs),
    /// Pause or resume a service
    Toggle { service: ServiceId },
    /// Delete a service
    Delete {
        service: ServiceId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Create a service
    Create(ServiceFormArgs),
    /// Edit a service's settings
    Edit {
        service: ServiceId,
        #[command(flatten)]
        form: ServiceFormArgs,
    },
    /// Change the administrator password
    Password(PasswordArgs),
    /// Show or change console settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Fetch and print once instead of watching
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddressArgs {
    pub service: ServiceId,
    pub address: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServiceFormArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// ssh, joomla, wordpress or phpmyadmin
    #[arg(long = "type")]
    pub service_type: Option<String>,
    /// Fill log path and lock with the recommended settings of the type
    #[arg(long)]
    pub recommended: bool,
    #[arg(long)]
    pub log_path: Option<String>,
    /// firewall, hosts or htaccess
    #[arg(long)]
    pub lock: Option<LockKind>,
    /// Port, daemon name or web folder, depending on the lock
    #[arg(long)]
    pub target: Option<String>,
    #[arg(long)]
    pub attempts: Option<String>,
    /// Minutes; 0 blocks permanently
    #[arg(long)]
    pub duration: Option<String>,
    /// Minutes
    #[arg(long)]
    pub threshold: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PasswordArgs {
    #[arg(long)]
    pub old: String,
    #[arg(long)]
    pub new: String,
    #[arg(long)]
    pub repeat: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Change and save settings
    Set {
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long)]
        timeout: Option<u64>,
    },
}

pub async fn run_command(cli: Cli) -> Result<ExitCode> {
    let mut settings = Settings::new();
    if let Some(server) = &cli.server {
        settings.set_server_url(server)?;
    }
    if let Some(interval) = cli.interval {
        settings.set_refresh_interval(interval)?;
    }

    let gateway = Arc::new(HttpGateway::new(
        settings.server_url(),
        settings.request_timeout(),
    )?);
    info!("Using backend at {}", gateway.base_url());
    let interval = settings.refresh_interval();
    let coordinator = RuleActionCoordinator::new(Arc::clone(&gateway));

    let outcome = match cli.command {
        Commands::Services(watch) if watch.once => return Ok(show_services(gateway).await),
        Commands::Services(_) => {
            watch_services(gateway, interval, OperatorInput::stdin(), interrupted()).await;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Ips { service, watch } if watch.once => {
            return Ok(show_ips(gateway, service).await)
        }
        Commands::Ips { service, .. } => {
            watch_ips(gateway, service, interval, OperatorInput::stdin(), interrupted()).await;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Block(a) => {
            coordinator
                .block_or_unblock(a.service, &a.address, true, false)
                .await
        }
        Commands::Whitelist(a) => {
            coordinator
                .block_or_unblock(a.service, &a.address, false, true)
                .await
        }
        Commands::Blacklist(a) => {
            coordinator
                .block_or_unblock(a.service, &a.address, true, true)
                .await
        }
        Commands::RemoveRule(a) => coordinator.remove_static_rule(a.service, &a.address).await,
        Commands::Unblock(a) => {
            let status = current_status(&gateway, a.service, &a.address).await?;
            match coordinator.unblock(a.service, &a.address, status).await {
                Some(outcome) => outcome,
                None => {
                    println!("{} is not blocked ({})", a.address, status.label());
                    return Ok(ExitCode::SUCCESS);
                }
            }
        }
        Commands::Toggle { service } => coordinator.toggle_run_state(service).await,
        Commands::Delete { service, yes } => {
            let mut coordinator = coordinator;
            coordinator.set_for_deletion(DeletionTarget::Service(service));
            if !yes {
                coordinator.cancel_deletion();
                println!("Run again with --yes to delete service {}", service);
                return Ok(ExitCode::SUCCESS);
            }
            match coordinator.confirm_deletion().await {
                Some(outcome) => outcome,
                None => return Ok(ExitCode::SUCCESS),
            }
        }
        Commands::Create(form) => return save_service(&gateway, None, form).await,
        Commands::Edit { service, form } => {
            return save_service(&gateway, Some(service), form).await
        }
        Commands::Password(p) => coordinator.change_password(&p.old, &p.new, &p.repeat).await?,
        // Saved settings only, without this run's overrides.
        Commands::Config(command) => return run_config(&mut Settings::new(), command),
    };

    Ok(report(&outcome))
}

fn run_config(settings: &mut Settings, command: ConfigCommand) -> Result<ExitCode> {
    match command {
        ConfigCommand::Show => {
            let json = serde_json::to_string_pretty(settings.settings())
                .context("Failed to serialize settings")?;
            println!("# {}", settings.path().display());
            println!("{}", json);
        }
        ConfigCommand::Set {
            server,
            interval,
            timeout,
        } => {
            if let Some(server) = server {
                settings.set_server_url(&server)?;
            }
            if let Some(interval) = interval {
                settings.set_refresh_interval(interval)?;
            }
            if let Some(timeout) = timeout {
                settings.set_request_timeout(timeout)?;
            }
            settings.save()?;
            println!("Saved settings to {}", settings.path().display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn report(outcome: &ActionOutcome) -> ExitCode {
    if outcome.is_done() {
        println!("{}", outcome.message());
        return ExitCode::SUCCESS;
    }
    eprintln!("{}", outcome.message());
    match outcome {
        // Expected refusals are not failures of the console.
        ActionOutcome::Refused { .. } => ExitCode::from(2),
        _ => {
            if outcome.error().is_some_and(ApiError::requires_reload) {
                eprintln!("Check the server address with `ips-console config show` and retry.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn current_status(
    gateway: &Arc<HttpGateway>,
    service: ServiceId,
    address: &str,
) -> Result<AddressStatus> {
    let mut dynamic = blocked_list(Arc::clone(gateway), service);
    let mut rules = static_list(Arc::clone(gateway), service);
    dynamic
        .refresh()
        .await
        .map_err(|e| anyhow!(e.describe("load the list of blocked IPs")))?;
    rules
        .refresh()
        .await
        .map_err(|e| anyhow!(e.describe("load the list of static rules")))?;
    Ok(AddressStatus::resolve(address, dynamic.items(), rules.items()))
}

async fn save_service(
    gateway: &Arc<HttpGateway>,
    service: Option<ServiceId>,
    args: ServiceFormArgs,
) -> Result<ExitCode> {
    let mut form = ConfigForm::new();
    match service {
        Some(id) => form.open_for_edit(&**gateway, id).await?,
        None => form.open_for_create(),
    }

    if let Some(service_type) = &args.service_type {
        form.set_field(Field::ServiceType, service_type)?;
    }
    if args.recommended && !form.apply_recommended_defaults() {
        warn!("No recommended settings for this service");
    }
    if let Some(kind) = args.lock {
        form.set_lock_kind(kind)?;
    }
    let edits = [
        (Field::Name, args.name),
        (Field::LogPath, args.log_path),
        (Field::LockTarget, args.target),
        (Field::MaxAttempts, args.attempts),
        (Field::BlockDuration, args.duration),
        (Field::TimeThreshold, args.threshold),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            form.set_field(field, &value)?;
        }
    }

    let Some(view) = form.view() else {
        return Err(anyhow!("The service form did not open"));
    };
    let fields = form.fields();
    match form.target() {
        Some(id) => println!("Service {}: {}", id, fields.name),
        None => println!("New service: {}", fields.name),
    }
    if view.protected {
        println!("  Admin panel: only the timing settings apply");
    }
    if view.service_fields {
        let target = if fields.lock_target.trim().is_empty() {
            format!("e.g. {}", view.lock_placeholder)
        } else {
            fields.lock_target.clone()
        };
        println!("  Log:  {}", fields.log_path);
        println!("  Lock: {} ({}: {})", view.lock_kind, view.lock_label, target);
    }
    println!("  {}", view.hint);
    if let Some(error) = &view.error {
        debug!("Form is not valid yet: {}", error);
    }
    if !view.save_enabled {
        return Err(anyhow!("The service form is busy"));
    }
    form.submit(&**gateway).await?;
    println!("{}", SAVED_MESSAGE);
    // Saved either way; the dashboard is informational.
    show_services(Arc::clone(gateway)).await;
    Ok(ExitCode::SUCCESS)
}

fn print_countdown(seconds: u32) {
    print!("\rNext refresh in {:>3}s (Enter to refresh now) ", seconds);
    let _ = std::io::stdout().flush();
}

fn print_outcome(outcome: &ActionOutcome) {
    if outcome.is_done() {
        println!("\n{}", outcome.message());
    } else {
        eprintln!("\n{}", outcome.message());
    }
}

/// Resolves on Ctrl+C.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Can't listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Lines the operator types while a view is being watched.
struct OperatorInput<R> {
    lines: Lines<R>,
    open: bool,
}

impl OperatorInput<BufReader<Stdin>> {
    fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> OperatorInput<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            open: true,
        }
    }

    /// Next typed line. Never resolves after EOF.
    async fn next_line(&mut self) -> String {
        loop {
            if !self.open {
                std::future::pending::<()>().await;
            }
            match self.lines.next_line().await {
                Ok(Some(line)) => return line,
                Ok(None) => self.open = false,
                Err(e) => {
                    debug!("Stopped reading stdin: {}", e);
                    self.open = false;
                }
            }
        }
    }
}

/// A command typed while watching. An empty line refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchInput {
    Refresh,
    Toggle(ServiceId),
    Delete(ServiceId),
    Block(String),
    Unblock(String),
    Whitelist(String),
    Blacklist(String),
    RemoveRule(String),
    Unknown,
}

impl WatchInput {
    fn parse(line: &str) -> Self {
        let words: Vec<&str> = line.split_whitespace().collect();
        let service = |id: &str, into: fn(ServiceId) -> WatchInput| {
            id.parse().map(into).unwrap_or(WatchInput::Unknown)
        };
        match words.as_slice() {
            [] | ["refresh"] => WatchInput::Refresh,
            ["toggle", id] => service(id, WatchInput::Toggle),
            ["delete", id] => service(id, WatchInput::Delete),
            ["block", address] => WatchInput::Block(address.to_string()),
            ["unblock", address] => WatchInput::Unblock(address.to_string()),
            ["whitelist", address] => WatchInput::Whitelist(address.to_string()),
            ["blacklist", address] => WatchInput::Blacklist(address.to_string()),
            ["remove", address] => WatchInput::RemoveRule(address.to_string()),
            _ => WatchInput::Unknown,
        }
    }
}

async fn show_services<G: Gateway + 'static>(gateway: Arc<G>) -> ExitCode {
    let view = Mutex::new(service_list(gateway));
    let result = PollingScheduler::new(1).run_once(&view).await;
    print!("{}", view.lock().await.render());
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Watch the dashboard until `quit` resolves.
///
/// Typed commands: Enter refreshes, `toggle <id>`, `delete <id>` (then `yes`).
async fn watch_services<G, R>(
    gateway: Arc<G>,
    interval: u32,
    mut input: OperatorInput<R>,
    quit: impl Future<Output = ()>,
) where
    G: Gateway + 'static,
    R: AsyncBufRead + Unpin,
{
    let view = Arc::new(Mutex::new(service_list(Arc::clone(&gateway))));
    let mut scheduler = PollingScheduler::new(interval);
    let mut events = scheduler.subscribe();
    let mut coordinator = RuleActionCoordinator::new(gateway).with_refresh(scheduler.handle());
    debug!("Watching services every {}s", scheduler.interval());
    scheduler.start(Arc::clone(&view));
    tokio::pin!(quit);

    loop {
        tokio::select! {
            _ = &mut quit => break,
            line = input.next_line() => {
                on_services_input(&line, &view, &mut coordinator, &scheduler).await;
            }
            event = events.recv() => match event {
                Ok(PollEvent::Countdown(seconds)) => print_countdown(seconds),
                Ok(PollEvent::Refreshed) => {
                    println!("\n== Services ==");
                    print!("{}", view.lock().await.render());
                }
                // The countdown keeps running; the next fetch retries.
                Ok(PollEvent::Failed(error)) => {
                    if error.requires_reload() {
                        info!("Backend session needs a reload: {}", error);
                    }
                    println!();
                    print!("{}", view.lock().await.render());
                }
                Err(RecvError::Lagged(missed)) => debug!("Missed {} scheduler events", missed),
                Err(RecvError::Closed) => break,
            },
        }
    }

    scheduler.stop();
    println!();
}

async fn on_services_input<G: Gateway + 'static>(
    line: &str,
    view: &Mutex<ServiceListView<G>>,
    coordinator: &mut RuleActionCoordinator<G>,
    scheduler: &PollingScheduler,
) {
    if let Some(target) = coordinator.pending_deletion().cloned() {
        if line.trim().eq_ignore_ascii_case("yes") {
            if let Some(outcome) = coordinator.confirm_deletion().await {
                print_outcome(&outcome);
            }
        } else {
            debug!("Cancelled deletion of {:?}", target);
            coordinator.cancel_deletion();
            println!("\nDeletion cancelled");
        }
        return;
    }

    match WatchInput::parse(line) {
        WatchInput::Refresh => {
            view.lock().await.dismiss_banner();
            scheduler.refresh_now();
        }
        WatchInput::Toggle(id) => print_outcome(&coordinator.toggle_run_state(id).await),
        WatchInput::Delete(id) => {
            let card = view.lock().await.find(id).map(ServiceCard::from);
            match card {
                Some(card) if !card.deletable => {
                    eprintln!("\nThe admin panel service can't be deleted")
                }
                Some(card) => {
                    println!("\nDelete {} ({})? Type yes to confirm", card.name, id);
                    coordinator.set_for_deletion(DeletionTarget::Service(id));
                }
                None => eprintln!("\nNo service {}", id),
            }
        }
        _ => eprintln!("\nCommands: Enter, toggle <id>, delete <id>"),
    }
}

async fn show_ips<G: Gateway + 'static>(gateway: Arc<G>, service: ServiceId) -> ExitCode {
    let mut dynamic = blocked_list(Arc::clone(&gateway), service);
    let mut rules = static_list(gateway, service);
    let ok = dynamic.refresh().await.is_ok() & rules.refresh().await.is_ok();
    print!("{}", IpRuleListView::from_lists(&dynamic, &rules).render());
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Watch one service's addresses until `quit` resolves.
///
/// Typed commands: Enter refreshes, `block`, `unblock`, `whitelist`,
/// `blacklist` and `remove` followed by an address.
async fn watch_ips<G, R>(
    gateway: Arc<G>,
    service: ServiceId,
    interval: u32,
    mut input: OperatorInput<R>,
    quit: impl Future<Output = ()>,
) where
    G: Gateway + 'static,
    R: AsyncBufRead + Unpin,
{
    let dynamic = Arc::new(Mutex::new(blocked_list(Arc::clone(&gateway), service)));
    let rules = Arc::new(Mutex::new(static_list(Arc::clone(&gateway), service)));

    // Independent loops: neither list waits for the other.
    let mut dynamic_scheduler = PollingScheduler::new(interval);
    let mut rules_scheduler = PollingScheduler::new(interval);
    let mut dynamic_events = dynamic_scheduler.subscribe();
    let mut rules_events = rules_scheduler.subscribe();
    let handles = [dynamic_scheduler.handle(), rules_scheduler.handle()];
    let coordinator = RuleActionCoordinator::new(gateway)
        .with_refresh(dynamic_scheduler.handle())
        .with_refresh(rules_scheduler.handle());
    dynamic_scheduler.start(Arc::clone(&dynamic));
    rules_scheduler.start(Arc::clone(&rules));
    tokio::pin!(quit);

    loop {
        let event = tokio::select! {
            _ = &mut quit => break,
            line = input.next_line() => {
                on_ips_input(&line, service, (&dynamic, &rules), &coordinator, &handles).await;
                continue;
            }
            event = dynamic_events.recv() => event,
            event = rules_events.recv() => match event {
                // The dynamic list drives the countdown line.
                Ok(PollEvent::Countdown(_)) => continue,
                other => other,
            },
        };

        match event {
            Ok(PollEvent::Countdown(seconds)) => print_countdown(seconds),
            Ok(PollEvent::Refreshed) | Ok(PollEvent::Failed(_)) => {
                let view = {
                    let dynamic = dynamic.lock().await;
                    let rules = rules.lock().await;
                    IpRuleListView::from_lists(&*dynamic, &*rules)
                };
                println!("\n== Service {} ==", service);
                print!("{}", view.render());
            }
            Err(RecvError::Lagged(missed)) => debug!("Missed {} scheduler events", missed),
            Err(RecvError::Closed) => break,
        }
    }

    dynamic_scheduler.stop();
    rules_scheduler.stop();
    println!();
}

async fn on_ips_input<G: Gateway + 'static>(
    line: &str,
    service: ServiceId,
    (dynamic, rules): (&Mutex<DynamicBlockList<G>>, &Mutex<StaticRuleList<G>>),
    coordinator: &RuleActionCoordinator<G>,
    handles: &[RefreshHandle],
) {
    let outcome = match WatchInput::parse(line) {
        WatchInput::Refresh => {
            dynamic.lock().await.dismiss_banner();
            rules.lock().await.dismiss_banner();
            handles.iter().for_each(RefreshHandle::trigger);
            return;
        }
        WatchInput::Block(address) => {
            coordinator
                .block_or_unblock(service, &address, true, false)
                .await
        }
        WatchInput::Whitelist(address) => {
            coordinator
                .block_or_unblock(service, &address, false, true)
                .await
        }
        WatchInput::Blacklist(address) => {
            coordinator
                .block_or_unblock(service, &address, true, true)
                .await
        }
        WatchInput::RemoveRule(address) => coordinator.remove_static_rule(service, &address).await,
        WatchInput::Unblock(address) => {
            let action = {
                let dynamic = dynamic.lock().await;
                let rules = rules.lock().await;
                IpRuleListView::from_lists(&*dynamic, &*rules)
                    .row(&address)
                    .and_then(|row| row.action)
            };
            match action {
                Some(RowAction::Unblock) => {
                    coordinator
                        .block_or_unblock(service, &address, false, false)
                        .await
                }
                Some(RowAction::RemoveRule) => {
                    coordinator.remove_static_rule(service, &address).await
                }
                None => {
                    eprintln!("\n{} is not blocked", address);
                    return;
                }
            }
        }
        _ => {
            eprintln!("\nCommands: Enter, block|unblock|whitelist|blacklist|remove <address>");
            return;
        }
    };
    print_outcome(&outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeBackend, FakeService};
    use crate::api::{ApiResponse, Method};
    use crate::models::ServiceType;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream};
    use tokio::time::sleep;

    /// An operator typing `lines` one second apart, then closing stdin.
    fn typed(lines: &'static [&'static str]) -> OperatorInput<BufReader<DuplexStream>> {
        let (mut tx, rx) = tokio::io::duplex(256);
        tokio::spawn(async move {
            for line in lines {
                sleep(Duration::from_secs(1)).await;
                let _ = tx.write_all(format!("{}\n", line).as_bytes()).await;
            }
        });
        OperatorInput::new(BufReader::new(rx))
    }

    #[test]
    fn test_parse_watch_input() {
        assert_eq!(WatchInput::parse(""), WatchInput::Refresh);
        assert_eq!(WatchInput::parse("  toggle 3 "), WatchInput::Toggle(ServiceId(3)));
        assert_eq!(WatchInput::parse("delete x"), WatchInput::Unknown);
        assert_eq!(
            WatchInput::parse("remove 10.0.0.1"),
            WatchInput::RemoveRule("10.0.0.1".to_string())
        );
        assert_eq!(WatchInput::parse("block"), WatchInput::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forbidden_dashboard_retried_at_interval_pace() {
        let backend = Arc::new(FakeBackend::new());
        backend.respond_always(Method::Get, "services", ApiResponse::new(403, ""));

        watch_services(
            Arc::clone(&backend),
            5,
            OperatorInput::new(tokio::io::empty()),
            sleep(Duration::from_secs(20)),
        )
        .await;

        // Fetches at 0, 5, 10, 15 and possibly 20 seconds.
        let fetches = backend.count(Method::Get, "services");
        assert!((4..=5).contains(&fetches), "{} fetches in 20s", fetches);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_delete_needs_confirmation() {
        let backend = Arc::new(FakeBackend::new());
        let kept = backend.add_service(FakeService::new("SSH", ServiceType::Ssh, "sshd"));
        let gone = backend.add_service(FakeService::new("Blog", ServiceType::Wordpress, "/var/www"));
        let input = typed(&["delete 2", "no", "delete 3", "yes", "delete 1", "yes"]);

        watch_services(Arc::clone(&backend), 5, input, sleep(Duration::from_secs(10))).await;

        assert!(backend.service(kept).is_some());
        assert!(backend.service(gone).is_none());
        assert!(backend.service(1).is_some());
        assert_eq!(backend.count(Method::Delete, "services/2"), 0);
        assert_eq!(backend.count(Method::Delete, "services/1"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_toggle_refreshes() {
        let backend = Arc::new(FakeBackend::new());
        let id = backend.add_service(FakeService::new("SSH", ServiceType::Ssh, "sshd"));

        watch_services(
            Arc::clone(&backend),
            30,
            typed(&["toggle 2"]),
            sleep(Duration::from_secs(5)),
        )
        .await;

        assert_eq!(backend.service(id).map(|s| s.stopped), Some(true));
        // Initial fetch plus the one the action requested.
        assert_eq!(backend.count(Method::Get, "services"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ip_commands_follow_row_actions() {
        let backend = Arc::new(FakeBackend::new());
        let id = ServiceId(backend.add_service(FakeService::new("SSH", ServiceType::Ssh, "sshd")));
        backend.detect(id.0, "10.0.0.7");
        let input = typed(&[
            "block 10.0.0.9",
            "blacklist 10.0.0.5",
            "unblock 10.0.0.7",
            "unblock 10.0.0.5",
            "unblock 10.0.0.8",
        ]);

        watch_ips(Arc::clone(&backend), id, 30, input, sleep(Duration::from_secs(10))).await;

        let mut dynamic = blocked_list(Arc::clone(&backend), id);
        let mut rules = static_list(Arc::clone(&backend), id);
        dynamic.refresh().await.unwrap();
        rules.refresh().await.unwrap();
        let view = IpRuleListView::from_lists(&dynamic, &rules);
        assert_eq!(view.row("10.0.0.9").map(|r| r.status), Some(AddressStatus::Blocked));
        assert_eq!(view.row("10.0.0.7").map(|r| r.status), Some(AddressStatus::Unblocked));
        assert!(view.row("10.0.0.5").is_none());
        assert!(rules.items().is_empty());
        // The blacklisted address was released through its rule.
        assert_eq!(backend.count(Method::Delete, "services/2/static"), 1);
        assert_eq!(backend.count(Method::Post, "services/2/blocked"), 2);
    }
}
