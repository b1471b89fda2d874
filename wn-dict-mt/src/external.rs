//! Simulated external page translator
//!
//! Real page translators work through a rendered page in batches, rewriting
//! text nodes and sometimes wrapping them in `<font>` tags. Their only
//! visible side effect on the boundary markers is that they get mutated once
//! the translator has passed them. [`ExternalTranslation`] reproduces that
//! behaviour over the headless content model and reports every change as a
//! [`DocumentEvent`] on a channel.

use crate::content::Inline;
use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, validate_locale};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A mutation observed on the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DocumentEvent {
    /// The translator rewrote a unit's content
    UnitMutated { unit: usize, nodes: Vec<Inline> },
    /// The translator touched a boundary marker
    MarkerMutated { marker_id: usize },
}

/// Order in which chunks of the document are translated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkOrder {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct ExternalConfig {
    pub source_locale: String,
    pub target_locale: String,
    /// Units translated per batch
    pub chunk_size: usize,
    pub order: ChunkOrder,
    /// Markers the translator never touches
    pub skip_markers: BTreeSet<usize>,
    /// Wrap rewritten text in font nodes
    pub wrap_in_font: bool,
    /// How many times the whole page is translated
    pub passes: usize,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        ExternalConfig {
            source_locale: "ja".to_string(),
            target_locale: "en".to_string(),
            chunk_size: 4,
            order: ChunkOrder::Forward,
            skip_markers: BTreeSet::new(),
            wrap_in_font: true,
            passes: 1,
        }
    }
}

/// The uncontrollable translation process
pub struct ExternalTranslation {
    translator: Arc<dyn MachineTranslator>,
    config: ExternalConfig,
}

impl ExternalTranslation {
    pub fn new(translator: Arc<dyn MachineTranslator>, config: ExternalConfig) -> Self {
        ExternalTranslation { translator, config }
    }

    pub fn config(&self) -> &ExternalConfig {
        &self.config
    }

    /// Translate `units` chunk by chunk, reporting mutations on `events`.
    ///
    /// Within a chunk every unit is rewritten before the chunk's boundary
    /// markers are touched. Neighbouring chunks share a boundary marker, so
    /// that marker is reported twice. A unit whose translation fails is left
    /// as it was; its markers are still reported.
    ///
    /// # Errors
    /// - `InvalidLocale` for malformed locale codes
    /// - `ChannelClosed` if the receiver went away
    pub async fn run(
        &self,
        units: Vec<Vec<Inline>>,
        events: mpsc::Sender<DocumentEvent>,
    ) -> MtResult<()> {
        validate_locale(&self.config.source_locale)?;
        validate_locale(&self.config.target_locale)?;

        let chunk_size = self.config.chunk_size.max(1);
        let mut chunks: Vec<(usize, usize)> = (0..units.len())
            .step_by(chunk_size)
            .map(|start| (start, (start + chunk_size).min(units.len())))
            .collect();
        if units.is_empty() {
            // A lone marker still gets touched
            chunks.push((0, 0));
        }
        if self.config.order == ChunkOrder::Reverse {
            chunks.reverse();
        }

        info!(
            provider = self.translator.provider_name(),
            units = units.len(),
            chunks = chunks.len(),
            passes = self.config.passes,
            "external translation started"
        );

        for pass in 0..self.config.passes {
            for &(start, end) in &chunks {
                debug!(pass, start, end, "translating chunk");
                for (unit, nodes) in units.iter().enumerate().take(end).skip(start) {
                    match self.translate_nodes(nodes).await {
                        Ok(nodes) => send(&events, DocumentEvent::UnitMutated { unit, nodes }).await?,
                        Err(err) => warn!(unit, error = %err, "translation failed, unit left as is"),
                    }
                }

                let mut markers: Vec<usize> = (start..=end)
                    .filter(|marker| !self.config.skip_markers.contains(marker))
                    .collect();
                if self.config.order == ChunkOrder::Reverse {
                    markers.reverse();
                }
                for marker_id in markers {
                    send(&events, DocumentEvent::MarkerMutated { marker_id }).await?;
                }
            }
        }
        Ok(())
    }

    /// Translate every text leaf of a unit in one batch, keeping the node structure
    async fn translate_nodes(&self, nodes: &[Inline]) -> MtResult<Vec<Inline>> {
        let mut texts = Vec::new();
        collect_texts(nodes, &mut texts);
        if texts.is_empty() {
            return Ok(nodes.to_vec());
        }

        let translated = self
            .translator
            .translate_batch(
                &texts,
                &self.config.source_locale,
                &self.config.target_locale,
            )
            .await?;
        if translated.len() != texts.len() {
            return Err(MtError::TranslationError(format!(
                "expected {} translations, got {}",
                texts.len(),
                translated.len()
            )));
        }

        let mut translated = translated.into_iter();
        Ok(rebuild(nodes, &mut translated, self.config.wrap_in_font))
    }
}

async fn send(events: &mpsc::Sender<DocumentEvent>, event: DocumentEvent) -> MtResult<()> {
    events.send(event).await.map_err(|_| MtError::ChannelClosed)
}

fn collect_texts(nodes: &[Inline], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Inline::Text { text } => out.push(text.clone()),
            Inline::Placeholder { children, .. } | Inline::Font { children } => {
                collect_texts(children, out)
            }
            Inline::Term { .. } => {}
        }
    }
}

fn rebuild(
    nodes: &[Inline],
    translated: &mut impl Iterator<Item = String>,
    wrap_in_font: bool,
) -> Vec<Inline> {
    nodes
        .iter()
        .map(|node| match node {
            Inline::Text { text } => {
                let text = Inline::text(translated.next().unwrap_or_else(|| text.clone()));
                if wrap_in_font {
                    Inline::font(vec![text])
                } else {
                    text
                }
            }
            Inline::Placeholder { entry_id, children } => Inline::Placeholder {
                entry_id: *entry_id,
                children: rebuild(children, translated, wrap_in_font),
            },
            Inline::Font { children } => Inline::font(rebuild(children, translated, wrap_in_font)),
            Inline::Term { .. } => node.clone(),
        })
        .collect()
}
