//! Single consumer of document events
//!
//! A [`Session`] owns the document and everything derived from it. Events
//! are applied strictly one at a time, so no locking is needed; resolution
//! of a stabilised unit runs to completion before the next event is read.

use crate::annotation::Annotations;
use crate::checkpoint::{CheckpointTracker, ObserveOutcome};
use crate::content::Document;
use crate::error::MtResult;
use crate::external::{DocumentEvent, ExternalTranslation};
use crate::resolver::{PlaceholderResolver, ResolvingHandler};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wn_dict::CompiledMapping;

/// Capacity of the event channel between the translator and the session
pub const EVENT_BUFFER: usize = 64;

/// Final state once the event stream ends
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub document: Document,
    pub annotations: Annotations,
    /// Units in the order they were resolved
    pub resolved_units: Vec<usize>,
    /// Units that never stabilised
    pub pending_units: Vec<usize>,
    pub term_count: usize,
    /// Mutations refused because the unit was already protected
    pub rejected_mutations: usize,
}

pub struct Session {
    document: Document,
    tracker: CheckpointTracker,
    mapping: CompiledMapping,
    annotations: Annotations,
    next_term_id: u64,
    resolved: Vec<usize>,
    rejected_mutations: usize,
}

impl Session {
    pub fn new(document: Document, mapping: CompiledMapping) -> Self {
        let tracker = CheckpointTracker::new(document.marker_count());
        Session {
            document,
            tracker,
            mapping,
            annotations: Annotations::new(),
            next_term_id: 1,
            resolved: Vec::new(),
            rejected_mutations: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tracker(&self) -> &CheckpointTracker {
        &self.tracker
    }

    /// Apply one event, returning the units it caused to be resolved
    pub fn handle(&mut self, event: DocumentEvent) -> Vec<usize> {
        match event {
            DocumentEvent::UnitMutated { unit, nodes } => {
                match self.document.apply_mutation(unit, nodes) {
                    Ok(true) => debug!(unit, "unit mutated"),
                    Ok(false) => {
                        self.rejected_mutations += 1;
                        debug!(unit, "mutation of protected unit ignored");
                    }
                    Err(err) => warn!(error = %err, "mutation ignored"),
                }
                Vec::new()
            }
            DocumentEvent::MarkerMutated { marker_id } => {
                let before = self.resolved.len();
                let mut handler = ResolvingHandler {
                    resolver: PlaceholderResolver::new(&self.mapping),
                    document: &mut self.document,
                    annotations: &mut self.annotations,
                    next_id: &mut self.next_term_id,
                    resolved: &mut self.resolved,
                };
                match self.tracker.observe(marker_id, &mut handler) {
                    ObserveOutcome::Recorded { stabilized } => {
                        debug!(marker_id, ?stabilized, "marker observed")
                    }
                    ObserveOutcome::Duplicate => {}
                    ObserveOutcome::OutOfRange => warn!(marker_id, "unknown marker ignored"),
                }
                self.resolved[before..].to_vec()
            }
        }
    }

    /// Consume events until every sender is dropped
    pub async fn run(mut self, mut events: mpsc::Receiver<DocumentEvent>) -> SessionReport {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        self.finish()
    }

    pub fn finish(self) -> SessionReport {
        let pending_units = self.tracker.pending_units();
        if !pending_units.is_empty() {
            info!(?pending_units, "units never stabilised");
        }
        SessionReport {
            term_count: self.annotations.len(),
            document: self.document,
            annotations: self.annotations,
            resolved_units: self.resolved,
            pending_units,
            rejected_mutations: self.rejected_mutations,
        }
    }
}

/// Run the external translator and a session against each other until the
/// translator is done.
///
/// # Errors
/// Propagates the translator's error; the session state is discarded then.
pub async fn translate_document(
    document: Document,
    mapping: CompiledMapping,
    external: &ExternalTranslation,
) -> MtResult<SessionReport> {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let units = document.snapshot();
    let session = Session::new(document, mapping);
    let (sent, report) = tokio::join!(external.run(units, tx), session.run(rx));
    sent?;
    info!(
        resolved = report.resolved_units.len(),
        pending = report.pending_units.len(),
        terms = report.term_count,
        "translation session finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Inline;
    use wn_dict::MappedEntry;

    fn mapping() -> CompiledMapping {
        CompiledMapping::new().with_entry(7, MappedEntry::new("Elder", None))
    }

    fn session(lines: usize) -> Session {
        let document = Document::new(
            (0..lines)
                .map(|_| vec![Inline::text("the "), Inline::placeholder(7)])
                .collect(),
        );
        Session::new(document, mapping())
    }

    #[test]
    fn test_markers_resolve_units() {
        let mut session = session(2);
        assert!(session.handle(DocumentEvent::MarkerMutated { marker_id: 1 }).is_empty());
        assert_eq!(session.handle(DocumentEvent::MarkerMutated { marker_id: 0 }), vec![0]);
        assert_eq!(session.handle(DocumentEvent::MarkerMutated { marker_id: 0 }), Vec::<usize>::new());
        assert_eq!(session.document().units[0].text(), "Elder");
        assert_eq!(session.document().units[1].text(), "the placeholder");

        let report = session.finish();
        assert_eq!(report.resolved_units, vec![0]);
        assert_eq!(report.pending_units, vec![1]);
        assert_eq!(report.term_count, 1);
    }

    #[test]
    fn test_protected_unit_refuses_mutation() {
        let mut session = session(1);
        session.handle(DocumentEvent::MarkerMutated { marker_id: 0 });
        session.handle(DocumentEvent::MarkerMutated { marker_id: 1 });
        session.handle(DocumentEvent::UnitMutated {
            unit: 0,
            nodes: vec![Inline::text("rewritten")],
        });
        session.handle(DocumentEvent::UnitMutated {
            unit: 3,
            nodes: Vec::new(),
        });
        let report = session.finish();
        assert_eq!(report.document.units[0].text(), "Elder");
        assert_eq!(report.rejected_mutations, 1);
    }

    #[test]
    fn test_term_ids_increase_across_units() {
        let mut session = session(3);
        for marker_id in [3, 2, 1, 0] {
            session.handle(DocumentEvent::MarkerMutated { marker_id });
        }
        let report = session.finish();
        assert_eq!(report.resolved_units, vec![2, 1, 0]);
        let ids: Vec<u64> = report
            .document
            .units
            .iter()
            .flat_map(|unit| unit.nodes.iter())
            .filter_map(|node| match node {
                Inline::Term { term_id, .. } => Some(*term_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_run_drains_channel() {
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(session(1).run(rx));
        tx.send(DocumentEvent::MarkerMutated { marker_id: 1 }).await.unwrap();
        tx.send(DocumentEvent::MarkerMutated { marker_id: 0 }).await.unwrap();
        drop(tx);
        let report = task.await.unwrap();
        assert_eq!(report.resolved_units, vec![0]);
        assert!(report.pending_units.is_empty());
    }
}
