use log::debug;
use std::collections::HashMap;

use crate::data_loader::EliminationEvent;
use crate::identity::Roster;

// Everything the single pass over the event log learns, beyond the per-participant
// kill/knock counters written straight into the roster.
#[derive(Debug, Default)]
pub struct EliminationLog {
    // Victims of confirmed eliminations, in source order. A victim can appear more
    // than once when the log records a fresh elimination after a revive; the last
    // occurrence is the real death and the placement resolver dedupes accordingly.
    pub death_order: Vec<String>,
    // Max event timestamp per identity that ever appeared as an eliminator.
    pub last_active: HashMap<String, f64>,
    // Whoever scored the temporally last confirmed elimination. Strong (not certain)
    // winner signal when placement has to be reconstructed.
    pub last_killer: Option<String>,
}

// Walks the event log once, strictly in source order. Knocks only bump the knock
// counter; a knock is not a death and never touches death order or rank.
pub fn process_eliminations(roster: &mut Roster, events: &[EliminationEvent]) -> EliminationLog {
    let mut log = EliminationLog::default();
    let mut last_kill_time = f64::NEG_INFINITY;

    for event in events {
        let time = event.time_seconds();

        if !event.eliminator.is_empty() {
            roster.get_or_insert_bot(&event.eliminator);

            let stamp = log.last_active.entry(event.eliminator.clone()).or_insert(time);
            if time > *stamp {
                *stamp = time;
            }
        }

        if event.knocked {
            if !event.eliminator.is_empty() {
                if let Some(p) = roster.get_mut(&event.eliminator) {
                    p.knocks += 1;
                }
            }
            // A knocked victim is still a participant even if the roster never
            // mentioned them; only death order stays untouched.
            if !event.victim.is_empty() {
                roster.get_or_insert_bot(&event.victim);
            }
            continue;
        }

        // Confirmed elimination from here on.
        let self_elim = event.eliminator == event.victim;

        if !event.eliminator.is_empty() && !self_elim {
            if let Some(p) = roster.get_mut(&event.eliminator) {
                p.kills += 1;
            }

            // Ties on the clock go to whichever event came later in the log.
            if time >= last_kill_time {
                last_kill_time = time;
                log.last_killer = Some(event.eliminator.clone());
            }
        }

        if !event.victim.is_empty() {
            let victim = roster.get_or_insert_bot(&event.victim);
            if !event.eliminator.is_empty() && !self_elim {
                victim.eliminated_by = Some(event.eliminator.clone());
            }

            log.death_order.push(event.victim.clone());
        }
    }

    for p in roster.iter() {
        if let Some(reported) = p.reported_kills {
            if reported != p.kills {
                debug!(
                    "decoder reported {reported} kills for {}, event log yields {}",
                    p.id, p.kills
                );
            }
        }
    }

    log
}
