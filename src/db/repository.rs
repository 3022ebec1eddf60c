use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::{
    Account, AccountRow, NewCommandLog, Player, PlayerRow, Streamer, StreamerRow,
};
use crate::error::AppError;
use crate::roster::RosterStore;

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_player(&self, row: PlayerRow) -> Result<Player, AppError> {
        let accounts = sqlx::query_as::<_, AccountRow>(
            "SELECT player_id, summoner_name FROM accounts WHERE player_id = ? ORDER BY id ASC",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let streamer = sqlx::query_as::<_, StreamerRow>(
            "SELECT player_id, name, streamer_name FROM streamers WHERE player_id = ?",
        )
        .bind(row.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Player {
            id: Some(row.id),
            name: row.name,
            position: row.position,
            team_tag: row.team_tag,
            streamer: streamer.map(Into::into),
            accounts: accounts.into_iter().map(Into::into).collect(),
        })
    }

    async fn upsert_player(&self, player: &Player) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let player_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO players (name, position, team_tag)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                position = excluded.position,
                team_tag = excluded.team_tag
            RETURNING id
            "#,
        )
        .bind(&player.name)
        .bind(&player.position)
        .bind(&player.team_tag)
        .fetch_one(&mut *tx)
        .await?;

        for account in &player.accounts {
            sqlx::query("INSERT OR IGNORE INTO accounts (player_id, summoner_name) VALUES (?, ?)")
                .bind(player_id)
                .bind(&account.summoner_name)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(streamer) = &player.streamer {
            sqlx::query(
                "INSERT OR IGNORE INTO streamers (player_id, name, streamer_name) VALUES (?, ?, ?)",
            )
            .bind(player_id)
            .bind(&streamer.name)
            .bind(&streamer.streamer_name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(player_id)
    }

    #[cfg(test)]
    pub async fn count_command_logs(&self) -> Result<usize, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM command_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    #[cfg(test)]
    pub async fn command_log_requesters(&self) -> Result<Vec<String>, AppError> {
        let requesters = sqlx::query_scalar("SELECT requester FROM command_logs ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(requesters)
    }
}

#[async_trait]
impl RosterStore for Repository {
    async fn find_player_by_name(&self, name: &str) -> Result<Option<Player>, AppError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            "SELECT id, name, position, team_tag FROM players WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_player(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_player_by_id(&self, id: i64) -> Result<Option<Player>, AppError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            "SELECT id, name, position, team_tag FROM players WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_player(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_account_by_summoner_name(
        &self,
        summoner_name: &str,
    ) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT player_id, summoner_name FROM accounts WHERE summoner_name = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(summoner_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_streamer_by_alias(&self, alias: &str) -> Result<Option<Streamer>, AppError> {
        let row = sqlx::query_as::<_, StreamerRow>(
            "SELECT player_id, name, streamer_name FROM streamers WHERE LOWER(streamer_name) = LOWER(?) LIMIT 1",
        )
        .bind(alias)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn save_player(&self, player: &Player) -> Result<Player, AppError> {
        let player_id = self.upsert_player(player).await?;

        self.find_player_by_id(player_id)
            .await?
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))
    }

    async fn create_command_log(&self, entry: NewCommandLog) -> Result<(), AppError> {
        sqlx::query("INSERT INTO command_logs (requester, command, channel) VALUES (?, ?, ?)")
            .bind(&entry.requester)
            .bind(&entry.command)
            .bind(&entry.channel)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
