//! Room manager: matchmaking, player-to-seat routing, and idle-room
//! eviction across every table currently open on this server.
//!
//! Unlike a table actor with a mailbox, a [`Room`] here sits behind a
//! plain synchronous `Mutex` — every request is a complete HTTP
//! request/response with no internal suspension point, so there is
//! nothing an actor loop would buy us that a short-lived lock does not.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::constants::SEAT_COUNT;
use crate::errors::{ManagerError, ManagerResult};
use crate::room::{Action, Response, Role, Room, RoomView};

/// Default idle window before an unattended room is reclaimed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Entry {
    room: Mutex<Room>,
    last_activity: Mutex<Instant>,
}

impl Entry {
    fn new(room: Room) -> Self {
        Self {
            room: Mutex::new(room),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_activity.lock().expect("room lock poisoned") = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_activity
            .lock()
            .expect("room lock poisoned")
            .elapsed()
    }
}

/// An action request payload, already decoded from the wire. One of
/// these maps onto exactly one `Room` method.
#[derive(Clone, Debug)]
pub enum ActionRequest {
    Declare { action: Action, target: Option<usize> },
    SelectTarget { target: usize },
    Respond { response: Response },
    LoseInfluence { role: Role },
    ConfirmExchange { kept: Vec<Role> },
}

pub struct RoomManager {
    rooms: RwLock<HashMap<u64, Arc<Entry>>>,
    players: RwLock<HashMap<Uuid, (u64, usize)>>,
    next_room_id: AtomicU64,
    idle_timeout: Duration,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl RoomManager {
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            players: RwLock::new(HashMap::new()),
            next_room_id: AtomicU64::new(1),
            idle_timeout,
        }
    }

    /// Seat a new player: join the oldest open room, or open a fresh one
    /// if none has a free seat. Returns the new player's id, the room it
    /// landed in, and its seat index within that room.
    pub fn matchmake(&self, name: String) -> (Uuid, u64, usize) {
        let entry = self.find_or_create_open_room();
        let seat = {
            let mut room = entry.room.lock().expect("room lock poisoned");
            room.join(name).expect("matchmaking only selects rooms with an open seat")
        };
        entry.touch();

        let room_id = {
            let room = entry.room.lock().expect("room lock poisoned");
            room.id
        };
        let player_id = Uuid::new_v4();
        self.players
            .write()
            .expect("players lock poisoned")
            .insert(player_id, (room_id, seat));
        (player_id, room_id, seat)
    }

    fn find_or_create_open_room(&self) -> Arc<Entry> {
        let existing = {
            let rooms = self.rooms.read().expect("rooms lock poisoned");
            rooms
                .iter()
                .filter(|(_, entry)| {
                    let room = entry.room.lock().expect("room lock poisoned");
                    !room.is_full()
                })
                .min_by_key(|(id, _)| **id)
                .map(|(_, entry)| Arc::clone(entry))
        };
        if let Some(entry) = existing {
            return entry;
        }

        let id = self.next_room_id.fetch_add(1, Ordering::SeqCst);
        let entry = Arc::new(Entry::new(Room::new(id)));
        self.rooms
            .write()
            .expect("rooms lock poisoned")
            .insert(id, Arc::clone(&entry));
        entry
    }

    fn entry_for(&self, room_id: u64) -> ManagerResult<Arc<Entry>> {
        self.rooms
            .read()
            .expect("rooms lock poisoned")
            .get(&room_id)
            .cloned()
            .ok_or(ManagerError::UnknownRoom)
    }

    fn seat_for(&self, player_id: Uuid, room_id: u64) -> ManagerResult<usize> {
        let players = self.players.read().expect("players lock poisoned");
        match players.get(&player_id) {
            Some((r, seat)) if *r == room_id => Ok(*seat),
            _ => Err(ManagerError::UnknownPlayer),
        }
    }

    /// The sanitized view for `player_id`'s seat in `room_id`.
    pub fn state(&self, player_id: Uuid, room_id: u64) -> ManagerResult<RoomView> {
        let seat = self.seat_for(player_id, room_id)?;
        let entry = self.entry_for(room_id)?;
        entry.touch();
        let room = entry.room.lock().expect("room lock poisoned");
        Ok(room.view_for(seat))
    }

    /// Apply one action-phase request on behalf of `player_id`.
    pub fn act(&self, player_id: Uuid, room_id: u64, request: ActionRequest) -> ManagerResult<()> {
        let seat = self.seat_for(player_id, room_id)?;
        let entry = self.entry_for(room_id)?;
        entry.touch();
        let mut room = entry.room.lock().expect("room lock poisoned");
        match request {
            ActionRequest::Declare { action, target } => room.declare_action(seat, action, target)?,
            ActionRequest::SelectTarget { target } => room.select_target(seat, target)?,
            ActionRequest::Respond { response } => room.respond(seat, response)?,
            ActionRequest::LoseInfluence { role } => room.choose_lose_influence(seat, role)?,
            ActionRequest::ConfirmExchange { kept } => room.confirm_exchange(seat, kept)?,
        }
        Ok(())
    }

    /// `player_id` leaves the game, freeing their seat for good.
    pub fn quit(&self, player_id: Uuid, room_id: u64) -> ManagerResult<()> {
        let seat = self.seat_for(player_id, room_id)?;
        let entry = self.entry_for(room_id)?;
        entry.touch();
        {
            let mut room = entry.room.lock().expect("room lock poisoned");
            room.quit(seat)?;
        }
        self.players
            .write()
            .expect("players lock poisoned")
            .remove(&player_id);
        Ok(())
    }

    /// Drop every room that has not seen activity within the idle
    /// window. Intended to be driven by a periodic background sweep in
    /// the server binary, not called from request handlers.
    pub fn evict_idle_rooms(&self) -> usize {
        let stale: Vec<u64> = {
            let rooms = self.rooms.read().expect("rooms lock poisoned");
            rooms
                .iter()
                .filter(|(_, entry)| entry.idle_for() >= self.idle_timeout)
                .map(|(id, _)| *id)
                .collect()
        };
        if stale.is_empty() {
            return 0;
        }
        let mut rooms = self.rooms.write().expect("rooms lock poisoned");
        let mut players = self.players.write().expect("players lock poisoned");
        for id in &stale {
            rooms.remove(id);
        }
        players.retain(|_, (room_id, _)| !stale.contains(room_id));
        stale.len()
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.read().expect("rooms lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchmaking_fills_one_room_before_opening_another() {
        let manager = RoomManager::default();
        let mut room_id = None;
        for i in 0..SEAT_COUNT {
            let (_, rid, seat) = manager.matchmake(format!("p{i}"));
            assert_eq!(seat, i);
            room_id.get_or_insert(rid);
            assert_eq!(Some(rid), room_id);
        }
        assert_eq!(manager.room_count(), 1);
        let (_, rid2, _) = manager.matchmake("overflow".to_string());
        assert_ne!(rid2, room_id.unwrap());
        assert_eq!(manager.room_count(), 2);
    }

    #[test]
    fn unknown_player_is_rejected() {
        let manager = RoomManager::default();
        let (_, room_id, _) = manager.matchmake("solo".to_string());
        let err = manager.state(Uuid::new_v4(), room_id).unwrap_err();
        assert_eq!(err, ManagerError::UnknownPlayer);
    }

    #[test]
    fn quit_frees_the_player_mapping() {
        let manager = RoomManager::default();
        let (player_id, room_id, _) = manager.matchmake("solo".to_string());
        manager.quit(player_id, room_id).unwrap();
        let err = manager.state(player_id, room_id).unwrap_err();
        assert_eq!(err, ManagerError::UnknownPlayer);
    }
}
