//! Executes parsed commands against the configured database.

use crate::user_commands::UserCommands;
use crate::{CliError, Commands, Result as CliErrorResult};

use uid_config::Config;
use uid_core::{
    MemoryRecordStore, MigrationEngine, MigrationPass, NewUser, RecordStore, SerialStrategy,
    UserDirectory, UserUpdate,
};
use uid_db::SqliteRecordStore;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::info;
use serde_json::{Map, Value, json};

pub struct App {
    config: Config,
    engine: MigrationEngine,
    directory: UserDirectory<SqliteRecordStore>,
    pretty: bool,
}

impl App {
    /// Open the database named by `config` and run its migrations.
    pub async fn open(config: Config, pretty: bool) -> CliErrorResult<Self> {
        let store = SqliteRecordStore::open(&config.database_path()).await?;
        Self::with_store(config, store, pretty)
    }

    pub fn with_store(
        config: Config,
        store: SqliteRecordStore,
        pretty: bool,
    ) -> CliErrorResult<Self> {
        let strategy: SerialStrategy = config.migration.serial_strategy.parse()?;
        let engine = MigrationEngine::new(strategy);
        let directory = UserDirectory::new(Arc::new(store), engine, config.migration.auto_migrate);

        Ok(Self {
            config,
            engine,
            directory,
            pretty,
        })
    }

    pub fn store(&self) -> &SqliteRecordStore {
        self.directory.store()
    }

    pub async fn execute(&self, command: Commands) -> CliErrorResult<Value> {
        match command {
            Commands::Migrate { dry_run, strategy } => {
                let engine = match strategy {
                    Some(strategy) => MigrationEngine::new(strategy.parse()?),
                    None => self.engine,
                };
                if dry_run {
                    self.migrate_dry_run(engine).await
                } else {
                    let report = engine.run(self.store()).await?;
                    Ok(json!({
                        "dry_run": false,
                        "strategy": engine.strategy().as_str(),
                        "report": serde_json::to_value(report)?,
                    }))
                }
            }
            Commands::Status => self.status().await,
            Commands::Reset { pass, all } => self.reset(pass.as_deref(), all).await,
            Commands::Watch { interval } => self.watch(Duration::from_secs(interval)).await,
            Commands::Id { action } => action.execute(),
            Commands::User { action } => self.user(action).await,
        }
    }

    /// Migrate a throwaway copy of the current data, completion markers included.
    async fn migrate_dry_run(&self, engine: MigrationEngine) -> CliErrorResult<Value> {
        let store = self.store();
        let scratch = MemoryRecordStore::with_users(store.list_users().await?);

        for pass in MigrationPass::ALL {
            let state = store.migration_state(pass).await?;
            if state.completed {
                let at = state.completed_at.unwrap_or_else(Utc::now);
                scratch.mark_migration_completed(pass, at).await?;
            }
        }

        let report = engine.run(&scratch).await?;
        let users = scratch.list_users().await?;

        Ok(json!({
            "dry_run": true,
            "strategy": engine.strategy().as_str(),
            "report": serde_json::to_value(report)?,
            "users": serde_json::to_value(users)?,
        }))
    }

    async fn status(&self) -> CliErrorResult<Value> {
        let store = self.store();
        let users = store.list_users().await?;

        let mut passes = Vec::with_capacity(MigrationPass::ALL.len());
        for pass in MigrationPass::ALL {
            passes.push(serde_json::to_value(store.migration_state(pass).await?)?);
        }

        let counters: Map<String, Value> = store
            .serial_counters()
            .await?
            .into_iter()
            .map(|(prefix, last)| (prefix, Value::from(last)))
            .collect();

        Ok(json!({
            "database": self.config.database_path().display().to_string(),
            "strategy": self.engine.strategy().as_str(),
            "auto_migrate": self.config.migration.auto_migrate,
            "users": {
                "total": users.len(),
                "legacy": users.iter().filter(|u| u.is_legacy()).count(),
                "fully_migrated": users.iter().filter(|u| u.is_fully_migrated()).count(),
                "missing_role": users.iter().filter(|u| u.role().is_none()).count(),
            },
            "migration": passes,
            "serial_counters": counters,
        }))
    }

    async fn reset(&self, pass: Option<&str>, all: bool) -> CliErrorResult<Value> {
        let passes = match pass {
            _ if all => MigrationPass::ALL.to_vec(),
            Some(pass) => vec![pass.parse()?],
            None => {
                return Err(CliError::invalid_argument(
                    "either --pass or --all is required",
                ));
            }
        };

        for pass in &passes {
            self.store().reset_migration_state(*pass).await?;
            info!("Reset migration pass {}", pass);
        }

        Ok(json!({ "reset": passes }))
    }

    /// Run the directory until interrupted. The SQLite store only notifies
    /// for writes made through this process, so the database is also re-read
    /// every `interval`.
    async fn watch(&self, interval: Duration) -> CliErrorResult<Value> {
        let mut states = self.directory.subscribe();
        let run = self.directory.run();
        tokio::pin!(run);

        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; run() already refreshes on start
        ticker.tick().await;

        let mut published = 0usize;
        loop {
            tokio::select! {
                _ = &mut run => break,
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = states.borrow_and_update().clone();
                    if !state.loading {
                        println!("{}", render(&serde_json::to_value(&state)?, self.pretty)?);
                        published += 1;
                    }
                }
                _ = ticker.tick() => self.directory.refresh().await,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping watch");
                    break;
                }
            }
        }

        Ok(json!({ "published": published }))
    }

    async fn user(&self, action: UserCommands) -> CliErrorResult<Value> {
        match action {
            UserCommands::List { role } => {
                self.directory.refresh().await;
                let mut state = self.directory.snapshot();
                if let Some(role) = role {
                    state.users.retain(|u| u.role() == Some(role.trim()));
                }
                Ok(serde_json::to_value(state)?)
            }
            UserCommands::Get { key } => {
                Ok(serde_json::to_value(self.directory.get_user(&key).await?)?)
            }
            UserCommands::Create {
                email,
                role,
                fields,
            } => {
                let new_user = fields
                    .into_iter()
                    .fold(NewUser::new(email, role), |user, (name, value)| {
                        user.with_field(name, value)
                    });
                let record = self.directory.create_user(new_user).await?;
                Ok(serde_json::to_value(record)?)
            }
            UserCommands::Update {
                key,
                role,
                fields,
                unset,
            } => {
                let mut update = UserUpdate {
                    role_id: role,
                    fields: fields.into_iter().collect(),
                };
                for name in unset {
                    update.fields.insert(name, Value::Null);
                }
                let record = self.directory.update_user(&key, update).await?;
                Ok(serde_json::to_value(record)?)
            }
            UserCommands::Delete { key } => {
                self.directory.delete_user(&key).await?;
                Ok(json!({ "deleted": key }))
            }
        }
    }
}

pub fn render(value: &Value, pretty: bool) -> CliErrorResult<String> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(output)
}
