// ═══════════════════════════════════════════════════════════════════════
// Event log — append-only record of every state change
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::SetPattern;
use crate::types::{CardId, Phase, PlayerId, TerritoryId};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Setup ──
    GameStarted { players: Vec<String>, territories: usize, cards: usize },
    TerritoryAssigned { territory: TerritoryId, player: PlayerId },
    StartingArmiesPlaced { player: PlayerId, armies: u32 },

    // ── Trade ──
    CardsTraded {
        cards: [CardId; 3],
        pattern: SetPattern,
        value: u32,
        tier: u32,
        territory_bonus: Option<(TerritoryId, u32)>,
        forced: bool,
    },

    // ── Draft ──
    ReinforcementsComputed { territories: u32, base: u32, continent_bonus: u32, pool: u32 },
    ArmiesDrafted { territory: TerritoryId, armies: u32, remaining: u32 },
    AutoDrafted { territory: TerritoryId, armies: u32 },

    // ── Attack ──
    AttackResolved {
        from: TerritoryId,
        to: TerritoryId,
        defender: PlayerId,
        attacker_dice: Vec<u8>,
        defender_dice: Vec<u8>,
        attacker_losses: u32,
        defender_losses: u32,
        conquered: bool,
        moved_in: u32,
    },
    TerritoryOccupied { from: TerritoryId, to: TerritoryId, armies: u32 },
    PlayerEliminated { player: PlayerId, cards_taken: usize },
    NoLegalAttacks,
    AttackLimitReached { attacks: u32 },

    // ── Fortify ──
    Fortified { from: TerritoryId, to: TerritoryId, armies: u32 },

    // ── End ──
    DeckReshuffled { cards: usize },
    CardDrawn { card: CardId },
    CardGrantSkipped,
    TurnEnded { territories: usize, armies: u32, cards: usize, conquests: u32 },

    // ── Decisions ──
    PhasePassed,
    ActionRejected { decision: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub turn: u32,
    pub round: u32,
    /// Acting player when the event happened.
    pub player: Option<PlayerId>,
    pub phase: Phase,
    pub event: GameEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
    #[serde(skip)]
    cursor: usize,
}

impl EventLog {
    pub fn push(&mut self, record: EventRecord) {
        debug!(
            seq = record.seq,
            turn = record.turn,
            player = ?record.player,
            phase = %record.phase,
            event = ?record.event,
            "event"
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Records appended since the previous call.
    pub fn take_new(&mut self) -> &[EventRecord] {
        let start = self.cursor.min(self.records.len());
        self.cursor = self.records.len();
        &self.records[start..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seq: u64, event: GameEvent) -> EventRecord {
        EventRecord { seq, turn: 1, round: 1, player: Some(PlayerId(0)), phase: Phase::Attack, event }
    }

    #[test]
    fn cursor_returns_only_new_records() {
        let mut log = EventLog::default();
        log.push(record(0, GameEvent::NoLegalAttacks));
        log.push(record(1, GameEvent::PhasePassed));
        assert_eq!(log.take_new().len(), 2);
        assert!(log.take_new().is_empty());
        log.push(record(2, GameEvent::CardGrantSkipped));
        let fresh = log.take_new();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].seq, 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let rec = record(4, GameEvent::Fortified { from: TerritoryId(1), to: TerritoryId(2), armies: 3 });
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["event"]["type"], "fortified");
        assert_eq!(json["event"]["armies"], 3);
        assert_eq!(json["phase"], "Attack");
        let back: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
