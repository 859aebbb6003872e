//! Shared server state: the table map, per-table broadcast channels and the
//! viewer refcounts that drive table lifecycle. Tables are created lazily on
//! the first request or join and destroyed when the last viewer detaches.

use crate::config::Config;
use crate::game::error::GameResult;
use crate::game::seat::SeatAction;
use crate::game::snapshot::TableSnapshot;
use crate::game::table::{GameTable, TableOptions};
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

const BROADCAST_CAPACITY: usize = 64;

pub struct GameServer {
    options: TableOptions,
    debug_roles_enabled: bool,
    tables: RwLock<HashMap<String, GameTable>>,
    /// A unit signal per table; handlers re-render their own viewer's
    /// snapshot on every pulse.
    broadcasts: RwLock<HashMap<String, broadcast::Sender<()>>>,
    viewer_counts: RwLock<HashMap<String, usize>>,
}

impl GameServer {
    pub fn new(config: &Config) -> Self {
        Self {
            options: TableOptions {
                small_blind: config.small_blind,
                big_blind: config.big_blind,
                turn_time_secs: config.turn_time_secs,
                closure_rule: config.closure_rule,
            },
            debug_roles_enabled: config.debug_roles_enabled,
            tables: RwLock::new(HashMap::new()),
            broadcasts: RwLock::new(HashMap::new()),
            viewer_counts: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a viewer on a table, creating the table on first contact,
    /// and returns the broadcast handle the viewer should listen on.
    ///
    /// The counts lock is held across table creation and subscription, and
    /// `detach_viewer` holds it across teardown; attach and detach on the
    /// same table id therefore never interleave. Lock order is always
    /// counts, then tables, then broadcasts.
    pub async fn attach_viewer(&self, table_id: &str) -> broadcast::Receiver<()> {
        let mut counts = self.viewer_counts.write().await;
        *counts.entry(table_id.to_string()).or_insert(0) += 1;

        {
            let mut tables = self.tables.write().await;
            if !tables.contains_key(table_id) {
                tracing::info!("creating table {}", table_id);
                tables.insert(
                    table_id.to_string(),
                    GameTable::new(table_id.to_string(), self.options.clone()),
                );
            }
        }

        let mut broadcasts = self.broadcasts.write().await;
        broadcasts
            .entry(table_id.to_string())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Drops a viewer registration. The table is torn down once nobody is
    /// watching it, seated or not. The counts lock stays held through the
    /// removal so a concurrent attach cannot re-register against a table
    /// that is about to disappear.
    pub async fn detach_viewer(&self, table_id: &str) {
        let mut counts = self.viewer_counts.write().await;
        let remaining = match counts.get_mut(table_id) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => return,
        };
        if remaining == 0 {
            counts.remove(table_id);
            tracing::info!("destroying table {} (no viewers left)", table_id);
            self.tables.write().await.remove(table_id);
            self.broadcasts.write().await.remove(table_id);
        }
    }

    pub async fn snapshot(&self, table_id: &str, viewer_id: &str) -> Option<TableSnapshot> {
        let tables = self.tables.read().await;
        tables.get(table_id).map(|t| t.snapshot(viewer_id))
    }

    async fn notify(&self, table_id: &str) {
        let broadcasts = self.broadcasts.read().await;
        if let Some(tx) = broadcasts.get(table_id) {
            // Err just means nobody is listening right now
            let _ = tx.send(());
        }
    }

    /// Runs a mutation against one table and broadcasts on success. `Ok`
    /// from the table op is the state-changed signal.
    async fn mutate<F>(&self, table_id: &str, op: F) -> GameResult<()>
    where
        F: FnOnce(&mut GameTable) -> GameResult<()>,
    {
        let result = {
            let mut tables = self.tables.write().await;
            match tables.get_mut(table_id) {
                Some(table) => op(table),
                None => return Err(crate::game::error::GameError::NotAtTable),
            }
        };
        if result.is_ok() {
            self.notify(table_id).await;
        }
        result
    }

    pub async fn join_table(
        &self,
        table_id: &str,
        viewer_id: &str,
        player_name: String,
        chips: i64,
        position: usize,
        debug_role: bool,
    ) -> GameResult<()> {
        // The capability flag only sticks when the deployment allows it
        let debug_role = debug_role && self.debug_roles_enabled;
        self.mutate(table_id, |t| {
            t.add_player(viewer_id.to_string(), player_name, chips, position, debug_role)
        })
        .await
    }

    pub async fn player_action(
        &self,
        table_id: &str,
        viewer_id: &str,
        action: SeatAction,
    ) -> GameResult<()> {
        self.mutate(table_id, |t| t.handle_action(viewer_id, action))
            .await
    }

    pub async fn start_game(&self, table_id: &str) -> GameResult<()> {
        self.mutate(table_id, |t| t.start_new_hand()).await
    }

    pub async fn show_cards(&self, table_id: &str, viewer_id: &str) -> GameResult<()> {
        self.mutate(table_id, |t| t.show_cards(viewer_id)).await
    }

    pub async fn request_run_it_twice(&self, table_id: &str, viewer_id: &str) -> GameResult<()> {
        self.mutate(table_id, |t| t.request_run_it_twice(viewer_id))
            .await
    }

    pub async fn toggle_sly_reveal(&self, table_id: &str, viewer_id: &str) -> GameResult<()> {
        self.mutate(table_id, |t| t.toggle_sly_reveal(viewer_id))
            .await
    }

    pub async fn rig_next_hand(&self, table_id: &str, viewer_id: &str) -> GameResult<()> {
        self.mutate(table_id, |t| t.rig_next_hand(viewer_id)).await
    }

    /// Seat cleanup when a connection drops. Broadcasts only if the viewer
    /// actually held a seat.
    pub async fn disconnect(&self, table_id: &str, viewer_id: &str) {
        let removed = {
            let mut tables = self.tables.write().await;
            tables
                .get_mut(table_id)
                .map(|t| t.remove_player(viewer_id))
                .unwrap_or(false)
        };
        if removed {
            self.notify(table_id).await;
        }
    }

    /// One-second sweep across every live table. Broadcasts are sent after
    /// the table lock is released.
    pub async fn tick_all(&self) {
        let changed: Vec<String> = {
            let mut tables = self.tables.write().await;
            tables
                .iter_mut()
                .filter_map(|(id, table)| table.tick().then(|| id.clone()))
                .collect()
        };
        for table_id in changed {
            self.notify(&table_id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::GameError;
    use crate::game::table::HandState;

    fn server() -> GameServer {
        GameServer::new(&Config::default())
    }

    #[tokio::test]
    async fn test_table_created_on_attach_and_destroyed_on_last_detach() {
        let srv = server();
        let _rx1 = srv.attach_viewer("t1").await;
        let _rx2 = srv.attach_viewer("t1").await;
        assert!(srv.snapshot("t1", "x").await.is_some());

        srv.detach_viewer("t1").await;
        assert!(srv.snapshot("t1", "x").await.is_some());

        srv.detach_viewer("t1").await;
        assert!(srv.snapshot("t1", "x").await.is_none());
    }

    #[tokio::test]
    async fn test_reattach_after_teardown_gets_live_table() {
        let srv = server();
        let _rx = srv.attach_viewer("t1").await;
        srv.detach_viewer("t1").await;
        assert!(srv.snapshot("t1", "x").await.is_none());

        // a fresh attach rebuilds the table and a working channel
        let mut rx = srv.attach_viewer("t1").await;
        assert!(srv.snapshot("t1", "x").await.is_some());
        srv.join_table("t1", "a", "alice".to_string(), 1000, 0, false)
            .await
            .unwrap();
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_join_broadcasts_to_viewers() {
        let srv = server();
        let mut rx = srv.attach_viewer("t1").await;
        srv.join_table("t1", "a", "alice".to_string(), 1000, 0, false)
            .await
            .unwrap();
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_rejected_op_does_not_broadcast() {
        let srv = server();
        let mut rx = srv.attach_viewer("t1").await;
        srv.join_table("t1", "a", "alice".to_string(), 1000, 0, false)
            .await
            .unwrap();
        let _ = rx.try_recv();

        let err = srv
            .join_table("t1", "b", "bob".to_string(), 1000, 0, false)
            .await
            .unwrap_err();
        assert_eq!(err, GameError::PositionTaken { position: 0 });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_debug_role_requires_deployment_flag() {
        let srv = server();
        let _rx = srv.attach_viewer("t1").await;
        srv.join_table("t1", "m", "mona".to_string(), 1000, 0, true)
            .await
            .unwrap();
        assert_eq!(
            srv.rig_next_hand("t1", "m").await,
            Err(GameError::NotPrivileged)
        );

        let mut config = Config::default();
        config.debug_roles_enabled = true;
        let srv = GameServer::new(&config);
        let _rx = srv.attach_viewer("t1").await;
        srv.join_table("t1", "m", "mona".to_string(), 1000, 0, true)
            .await
            .unwrap();
        assert!(srv.rig_next_hand("t1", "m").await.is_ok());
    }

    #[tokio::test]
    async fn test_tick_all_fires_restart() {
        let srv = server();
        let _rx = srv.attach_viewer("t1").await;
        srv.join_table("t1", "a", "alice".to_string(), 1000, 0, false)
            .await
            .unwrap();
        srv.join_table("t1", "b", "bob".to_string(), 1000, 1, false)
            .await
            .unwrap();
        srv.start_game("t1").await.unwrap();

        let snap = srv.snapshot("t1", "a").await.unwrap();
        let active_id = snap.players[snap.active_position as usize]
            .as_ref()
            .unwrap()
            .id
            .clone();
        srv.player_action("t1", &active_id, SeatAction::Fold)
            .await
            .unwrap();

        // early end arms a 3 tick restart
        for _ in 0..3 {
            srv.tick_all().await;
        }
        let snap = srv.snapshot("t1", "a").await.unwrap();
        assert_eq!(snap.game_state, HandState::PreFlop);
    }
}
