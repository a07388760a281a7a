use cloudcode_types::protocol::{Content, PartPayload};
use std::collections::{HashMap, VecDeque};

use crate::proxy::common::random_id;

/// Assign `toolu_` ids to function calls with a blank id. Returns how many were filled.
pub fn backfill_call_ids(contents: &mut [Content]) -> usize {
    let mut filled = 0;
    for part in contents.iter_mut().flat_map(|c| c.parts.iter_mut()) {
        if let PartPayload::FunctionCall(call) = &mut part.payload {
            if call.id.trim().is_empty() {
                call.id = random_id::tool_call_id();
                filled += 1;
            }
        }
    }
    filled
}

/// Unanswered call ids, in content order, globally and per function name.
///
/// Ids are not assumed unique: `owners` keeps every name an id was issued
/// under, in call order, so a repeated id is tracked once per call.
#[derive(Default)]
struct PendingCalls {
    global: VecDeque<String>,
    by_name: HashMap<String, VecDeque<String>>,
    owners: HashMap<String, VecDeque<String>>,
}

impl PendingCalls {
    fn push(&mut self, id: &str, name: &str) {
        self.global.push_back(id.to_string());
        if !name.is_empty() {
            self.by_name.entry(name.to_string()).or_default().push_back(id.to_string());
            self.owners.entry(id.to_string()).or_default().push_back(name.to_string());
        }
    }

    /// Remove one occurrence of `id`, answered by a response named `response_name`.
    ///
    /// The response's own name queue is preferred; otherwise the earliest call
    /// that issued `id` gives up its entry.
    fn consume(&mut self, id: &str, response_name: &str) {
        remove_first(&mut self.global, id);
        let from_response_queue = !response_name.is_empty()
            && self.by_name.get_mut(response_name).is_some_and(|q| remove_first(q, id));

        let Some(names) = self.owners.get_mut(id) else {
            return;
        };
        if from_response_queue {
            remove_first(names, response_name);
        } else if let Some(owner) = names.pop_front() {
            if let Some(queue) = self.by_name.get_mut(&owner) {
                remove_first(queue, id);
            }
        }
        if names.is_empty() {
            self.owners.remove(id);
        }
    }

    /// Oldest call of `name`, else the oldest call of any name.
    fn take_for(&mut self, name: &str) -> Option<String> {
        let id = self
            .by_name
            .get(name)
            .and_then(|q| q.front().cloned())
            .or_else(|| self.global.front().cloned())?;
        self.consume(&id, name);
        Some(id)
    }
}

fn remove_first(queue: &mut VecDeque<String>, id: &str) -> bool {
    match queue.iter().position(|v| v == id) {
        Some(pos) => {
            queue.remove(pos);
            true
        },
        None => false,
    }
}

/// Give function responses without an id the id of a pending call.
///
/// Same-name calls are matched first-in first-out; otherwise the oldest pending
/// call of any name is used. Responses that already carry an id consume the
/// matching call so it is never handed out twice. Returns how many ids were filled.
pub fn reconcile_response_ids(contents: &mut [Content]) -> usize {
    let mut pending = PendingCalls::default();
    let mut filled = 0;

    for part in contents.iter_mut().flat_map(|c| c.parts.iter_mut()) {
        match &mut part.payload {
            PartPayload::FunctionCall(call) => {
                let id = call.id.trim();
                if !id.is_empty() {
                    pending.push(id, call.name.trim());
                }
            },
            PartPayload::FunctionResponse(resp) => {
                let id = resp.id.trim();
                if !id.is_empty() {
                    pending.consume(id, resp.name.trim());
                    continue;
                }
                if let Some(assigned) = pending.take_for(resp.name.trim()) {
                    resp.id = assigned;
                    filled += 1;
                }
            },
            PartPayload::Text(_) => {},
        }
    }
    filled
}
