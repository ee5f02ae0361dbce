use std::collections::{BTreeMap, VecDeque};

use crate::parsing::Section;

/// Resolves an import index against the number of original sections.
///
/// Non-negative indices insert before the section at that position; negative
/// ones count from the end, so `-1` appends. Out-of-range indices are clamped.
pub fn normalize_index(index: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let position = if index < 0 { len_i + index + 1 } else { index };
    if position < 0 || position > len_i {
        let clamped = position.clamp(0, len_i);
        log::warn!("import index {index} is outside 0..={len}, using {clamped}");
        return usize::try_from(clamped).unwrap_or(len);
    }
    usize::try_from(position).unwrap_or(len)
}

/// Section stream with imported sections spliced in.
///
/// Indices are resolved once against the original section count. Each import
/// is loaded only when the stream reaches its position; the first load error
/// is yielded and ends the stream.
pub struct Imports<S, F> {
    originals: VecDeque<Section>,
    position: usize,
    checked_position: bool,
    imports: BTreeMap<usize, Vec<S>>,
    queued: VecDeque<S>,
    expanded: VecDeque<Section>,
    loader: F,
    failed: bool,
}

impl<S, F> Imports<S, F> {
    pub fn new(
        sections: impl IntoIterator<Item = Section>,
        imports: BTreeMap<i64, Vec<S>>,
        loader: F,
    ) -> Self {
        let originals: VecDeque<Section> = sections.into_iter().collect();
        let len = originals.len();

        // Non-negative indices first so that, at a shared position, imports
        // keyed from the start precede those keyed from the end.
        let (forward, backward): (Vec<_>, Vec<_>) =
            imports.into_iter().partition(|(index, _)| *index >= 0);
        let mut resolved: BTreeMap<usize, Vec<S>> = BTreeMap::new();
        for (index, sources) in forward.into_iter().chain(backward) {
            resolved
                .entry(normalize_index(index, len))
                .or_default()
                .extend(sources);
        }

        Imports {
            originals,
            position: 0,
            checked_position: false,
            imports: resolved,
            queued: VecDeque::new(),
            expanded: VecDeque::new(),
            loader,
            failed: false,
        }
    }
}

impl<S, E, F> Iterator for Imports<S, F>
where
    F: FnMut(&S) -> Result<Vec<Section>, E>,
{
    type Item = Result<Section, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(section) = self.expanded.pop_front() {
                return Some(Ok(section));
            }
            if let Some(source) = self.queued.pop_front() {
                match (self.loader)(&source) {
                    Ok(sections) => {
                        log::debug!(
                            "importing {} section(s) at position {}",
                            sections.len(),
                            self.position
                        );
                        self.expanded.extend(sections);
                        continue;
                    }
                    Err(err) => {
                        self.failed = true;
                        return Some(Err(err));
                    }
                }
            }
            if !self.checked_position {
                self.checked_position = true;
                if let Some(sources) = self.imports.remove(&self.position) {
                    self.queued.extend(sources);
                }
                continue;
            }

            let section = self.originals.pop_front()?;
            self.position += 1;
            self.checked_position = false;
            return Some(Ok(section));
        }
    }
}
