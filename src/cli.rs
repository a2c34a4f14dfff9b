use std::path::PathBuf;
use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use findash_protocol::api::{MoneyAmount, Trend};

use crate::auth::{AuthEvents, AuthSession, AuthState};
use crate::client::ApiClient;
use crate::config::{AppConfig, ConfigService};
use crate::error::Result;
use crate::financial::FinancialService;
use crate::format::{abbreviate_number, format_currency, format_date, CurrencyStyle, DateStyle};
use crate::logger::ErrorLog;
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::ui::UI;
use crate::version::format_version_info;
use crate::{
    CapitalArgs, Commands, ConfigCommand, ErrorsArgs, TransactionsArgs, TransfersArgs,
};

/// Session transition hooks rendered on the terminal
struct TerminalAuthEvents {
    ui: Arc<UI>,
}

impl AuthEvents for TerminalAuthEvents {
    fn navigate_to_login(&self) {
        self.ui.info("Run `findash login` to continue.");
    }

    fn session_expired(&self) {
        self.ui
            .warning("Your session could not be renewed and has been closed.");
        self.navigate_to_login();
    }
}

struct Services {
    client: Arc<ApiClient>,
    session: AuthSession,
    financial: FinancialService,
}

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    ui: Arc<UI>,
}

impl CliHandler {
    /// Create a new CLI handler using the default config location
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            config_path: None,
            ui: Arc::new(UI::new()),
        }
    }

    /// Create a new CLI handler with a custom config path
    pub fn with_config_path(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ui: Arc::new(UI::new()),
        }
    }

    /// Load configuration using the handler's config path
    async fn load_config(&self) -> Result<AppConfig> {
        if let Some(path) = &self.config_path {
            AppConfig::load_from(path).await
        } else {
            AppConfig::load().await
        }
    }

    /// Wire the store, client and services for one command
    fn build_services(&self, config: &AppConfig) -> Result<Services> {
        let client_config = config.to_client_config();

        let store: Arc<dyn SessionStore> = match client_config.session_file.clone() {
            Some(path) => Arc::new(FileSessionStore::new(path)),
            None => Arc::new(MemorySessionStore::new()),
        };

        let log = Arc::new(ErrorLog::new().with_console(config.verbose || cfg!(debug_assertions)));
        let events: Arc<dyn AuthEvents> = Arc::new(TerminalAuthEvents {
            ui: self.ui.clone(),
        });

        let client = Arc::new(ApiClient::new(
            client_config,
            store.clone(),
            log,
            self.ui.clone(),
            events.clone(),
        )?);

        let session = AuthSession::new(client.clone(), store, events);
        let financial = FinancialService::new(client.clone());

        Ok(Services {
            client,
            session,
            financial,
        })
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login => self.handle_login().await,
            Commands::Register => self.handle_register().await,
            Commands::Logout => self.handle_logout().await,
            Commands::Status => self.handle_status().await,
            Commands::Profile => self.handle_profile().await,
            Commands::Refresh => self.handle_refresh().await,
            Commands::Summary => self.handle_summary().await,
            Commands::Transactions(args) => self.handle_transactions(args).await,
            Commands::Transfers(args) => self.handle_transfers(args).await,
            Commands::Capital(args) => self.handle_capital(args).await,
            Commands::Wallet => self.handle_wallet().await,
            Commands::Errors(args) => self.handle_errors(args).await,
            Commands::Config(args) => self.handle_config(args.command).await,
        }
    }

    /// Handle login command
    async fn handle_login(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?;
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?;

        let user = services.session.login(email.trim(), &password).await?;

        self.ui.card(
            "Signed in",
            vec![
                ("Name", user.full_name.clone()),
                ("Email", user.email.clone()),
                ("Role", user.role.clone()),
                (
                    "Last login",
                    format_date(&user.last_login_at, DateStyle::Long),
                ),
            ],
        );
        Ok(())
    }

    /// Handle register command
    async fn handle_register(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let full_name: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Full name")
            .interact_text()?;
        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?;
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?;

        services
            .session
            .register(full_name.trim(), email.trim(), &password)
            .await?;
        Ok(())
    }

    /// Handle logout command
    async fn handle_logout(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;
        services.session.logout().await;
        Ok(())
    }

    /// Handle status command
    async fn handle_status(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let state = services.session.initialize().await;
        let authenticated = matches!(state, AuthState::Authenticated(_));

        let mut rows = vec![
            ("Version", format_version_info()),
            ("Endpoint", config.endpoint.clone()),
            ("Authentication", self.ui.format_auth_status(authenticated)),
        ];

        if let AuthState::Authenticated(user) = &state {
            rows.push(("Name", self.ui.format_user_field(Some(user.full_name.clone()))));
            rows.push(("Email", self.ui.format_user_field(Some(user.email.clone()))));
        }

        self.ui.card("Status", rows);
        Ok(())
    }

    /// Handle profile command
    async fn handle_profile(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let user: findash_protocol::common::User = services
            .client
            .get(crate::auth::PROFILE_ENDPOINT, Default::default())
            .await?;

        self.ui.card(
            "Profile",
            vec![
                ("Name", user.full_name.clone()),
                ("Email", user.email.clone()),
                ("Role", user.role.clone()),
                ("Active", (if user.is_active { "yes" } else { "no" }).to_string()),
                (
                    "Last login",
                    format!(
                        "{} from {}",
                        format_date(&user.last_login_at, DateStyle::Long),
                        user.last_login_ip
                    ),
                ),
                ("Member since", format_date(&user.created_at, DateStyle::Short)),
            ],
        );
        Ok(())
    }

    /// Handle refresh command
    async fn handle_refresh(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;
        services.session.refresh_token().await?;
        self.ui.success("Access token refreshed.");
        Ok(())
    }

    /// Handle summary command
    async fn handle_summary(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let summary = services.financial.summary().await?;
        self.ui.card(
            "Financial summary",
            vec![
                ("Total balance", total_cell(&summary.total_balance)),
                ("Total expense", total_cell(&summary.total_expense)),
                ("Total savings", total_cell(&summary.total_savings)),
                (
                    "Last updated",
                    format_date(&summary.last_updated, DateStyle::Long),
                ),
            ],
        );
        Ok(())
    }

    /// Handle transactions command
    async fn handle_transactions(&mut self, args: TransactionsArgs) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let data = services.financial.recent_transactions(args.limit).await?;
        let lines = data
            .transactions
            .iter()
            .map(|tx| {
                format!(
                    "{}  {:<24} {:<20} {:>14}  {}",
                    format_date(&tx.date, DateStyle::Short),
                    tx.name,
                    tx.business,
                    format_currency(tx.amount, &tx.currency, CurrencyStyle::Signed),
                    tx.status
                )
            })
            .collect();
        self.ui.list("Recent transactions", lines);

        self.ui.card(
            "Totals",
            vec![
                (
                    "Income",
                    format_currency(data.summary.total_income, "USD", CurrencyStyle::Intl),
                ),
                (
                    "Expense",
                    format_currency(data.summary.total_expense, "USD", CurrencyStyle::Intl),
                ),
                ("Count", data.summary.count.to_string()),
            ],
        );
        Ok(())
    }

    /// Handle transfers command
    async fn handle_transfers(&mut self, args: TransfersArgs) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let data = services.financial.scheduled_transfers(args.limit).await?;
        let lines = data
            .transfers
            .iter()
            .map(|transfer| {
                format!(
                    "{}  {:<24} {:>14}  {}",
                    format_date(&transfer.date, DateStyle::Short),
                    transfer.name,
                    format_currency(transfer.amount, &transfer.currency, CurrencyStyle::Signed),
                    transfer.status
                )
            })
            .collect();
        self.ui.list("Scheduled transfers", lines);

        self.ui.card(
            "Totals",
            vec![
                (
                    "Scheduled",
                    format_currency(
                        data.summary.total_scheduled_amount,
                        "USD",
                        CurrencyStyle::Intl,
                    ),
                ),
                ("Count", data.summary.count.to_string()),
            ],
        );
        Ok(())
    }

    /// Handle capital command - monthly working-capital series
    async fn handle_capital(&mut self, args: CapitalArgs) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let data = services
            .financial
            .working_capital(args.period.as_deref())
            .await?;

        let lines = data
            .data
            .iter()
            .map(|point| {
                format!(
                    "{:<4} income {:>8}  expense {:>8}  net {:>8}",
                    point.month,
                    abbreviate_number(point.income),
                    abbreviate_number(point.expense),
                    abbreviate_number(point.net)
                )
            })
            .collect();
        self.ui
            .list(&format!("Working capital ({})", data.period), lines);

        self.ui.card(
            "Totals",
            vec![
                (
                    "Income",
                    format_currency(data.summary.total_income, &data.currency, CurrencyStyle::Intl),
                ),
                (
                    "Expense",
                    format_currency(
                        data.summary.total_expense,
                        &data.currency,
                        CurrencyStyle::Intl,
                    ),
                ),
                (
                    "Net",
                    format_currency(data.summary.net_balance, &data.currency, CurrencyStyle::Intl),
                ),
            ],
        );
        Ok(())
    }

    /// Handle wallet command
    async fn handle_wallet(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;

        let data = services.financial.wallet().await?;
        let lines = data
            .cards
            .iter()
            .map(|card| {
                format!(
                    "{:<16} {:<16} {:<12} {:02}/{}{}",
                    card.name,
                    card.bank,
                    card.card_number,
                    card.expiry_month,
                    card.expiry_year,
                    if card.is_default { "  [default]" } else { "" }
                )
            })
            .collect();
        self.ui.list("Wallet", lines);
        Ok(())
    }

    /// Handle errors command - inspect or clear this run's error log
    async fn handle_errors(&mut self, args: ErrorsArgs) -> Result<()> {
        let config = self.load_config().await?;
        let services = self.build_services(&config)?;
        let log = services.client.error_log();

        if args.clear {
            log.clear();
            self.ui.success("Error log cleared.");
            return Ok(());
        }

        let stats = log.stats();
        let mut rows = vec![("Total", stats.total.to_string())];
        for severity in crate::error::ErrorSeverity::ALL {
            rows.push((severity.as_str(), stats.by_severity[&severity].to_string()));
        }
        self.ui.card("Error log", rows);
        Ok(())
    }

    /// Handle config command
    async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        let config = self.load_config().await?;
        let mut service = if let Some(path) = self.config_path.clone() {
            ConfigService::with_config_path(config, path)
        } else {
            ConfigService::new(config)
        };

        match command {
            ConfigCommand::Show => {
                let config = service.current();
                self.ui.card(
                    "Configuration",
                    vec![
                        ("Endpoint", config.endpoint.clone()),
                        ("Timeout", format!("{}s", config.timeout)),
                        ("Verbose", config.verbose.to_string()),
                        (
                            "Storage dir",
                            config.storage_dir.to_string_lossy().to_string(),
                        ),
                        (
                            "Session storage",
                            config.session_storage_enabled.to_string(),
                        ),
                    ],
                );
            }
            ConfigCommand::SetEndpoint { url } => {
                service.set_endpoint(url).await?;
                self.ui.success("Endpoint updated.");
            }
            ConfigCommand::SetTimeout { seconds } => {
                service.set_timeout(seconds).await?;
                self.ui.success("Timeout updated.");
            }
            ConfigCommand::SetVerbose { enabled } => {
                service.set_verbose(enabled).await?;
                self.ui.success("Verbose flag updated.");
            }
            ConfigCommand::Reset => {
                service.reset().await?;
                self.ui.success("Configuration reset to defaults.");
            }
        }
        Ok(())
    }
}

fn total_cell(amount: &MoneyAmount) -> String {
    let arrow = match amount.change.trend {
        Trend::Up => "↑",
        Trend::Down => "↓",
    };
    format!(
        "{} ({}{:.1}%)",
        format_currency(amount.amount, &amount.currency, CurrencyStyle::Intl),
        arrow,
        amount.change.percentage
    )
}
