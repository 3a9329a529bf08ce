use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::{debug, warn};

use crate::entities::{prelude::*, settings};
use party_core::{BankCatalog, classic_pack};
use party_types::{WordBank, WordSource};

pub const WORD_BANKS_KEY: &str = "word_banks";
pub const SELECTED_BANK_KEY: &str = "selected_bank_id";
pub const WORD_SOURCE_KEY: &str = "word_source";

/// Everything the party remembers between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartySettings {
    pub catalog: BankCatalog,
    pub source: WordSource,
}

pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let model = Settings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .with_context(|| format!("Failed to read setting '{}'", key))?;
        Ok(model.map(|m| m.value))
    }

    pub async fn put(&self, key: &str, value: String) -> Result<()> {
        upsert(&self.db, key, value).await
    }

    /// Load stored settings, falling back per key: unreadable banks become
    /// the classic pack, an unknown selection becomes the first bank, and a
    /// missing source is `ai`.
    pub async fn load(&self) -> Result<PartySettings> {
        let banks = match self.get(WORD_BANKS_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<WordBank>>(&raw) {
                Ok(banks) if !banks.is_empty() => banks,
                Ok(_) => {
                    warn!("Stored word bank list is empty, using the classic pack");
                    vec![classic_pack()]
                }
                Err(e) => {
                    warn!("Stored word banks are unreadable ({}), using the classic pack", e);
                    vec![classic_pack()]
                }
            },
            None => vec![classic_pack()],
        };

        let selected = self.get(SELECTED_BANK_KEY).await?;
        let source = self
            .get(WORD_SOURCE_KEY)
            .await?
            .and_then(|raw| WordSource::parse(&raw))
            .unwrap_or_default();

        debug!("Loaded {} word banks, source {}", banks.len(), source.as_str());
        Ok(PartySettings {
            catalog: BankCatalog::new(banks, selected),
            source,
        })
    }

    /// Write all three keys in one transaction
    pub async fn save(&self, settings: &PartySettings) -> Result<()> {
        let banks = serde_json::to_string(settings.catalog.banks())
            .context("Failed to serialize word banks")?;

        let txn = self.db.begin().await?;
        upsert(&txn, WORD_BANKS_KEY, banks).await?;
        match settings.catalog.selected_id() {
            Some(id) => upsert(&txn, SELECTED_BANK_KEY, id.to_string()).await?,
            None => {
                Settings::delete_by_id(SELECTED_BANK_KEY.to_string())
                    .exec(&txn)
                    .await?;
            }
        }
        upsert(&txn, WORD_SOURCE_KEY, settings.source.as_str().to_string()).await?;
        txn.commit().await.context("Failed to commit settings")?;

        debug!("Saved {} word banks", settings.catalog.banks().len());
        Ok(())
    }
}

async fn upsert<C: ConnectionTrait>(conn: &C, key: &str, value: String) -> Result<()> {
    let model = settings::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Settings::insert(model)
        .on_conflict(
            OnConflict::column(settings::Column::Key)
                .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(conn)
        .await
        .with_context(|| format!("Failed to write setting '{}'", key))?;
    Ok(())
}
