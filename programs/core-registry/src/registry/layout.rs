use anchor_lang::prelude::*;

use crate::errors::RegistryError;
use crate::plugins::{ExternalAdapterKey, PluginType};

/// Identity of one record in the registry. Ordered by section first:
/// internal plugins, then external adapters (data sections sort last).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordId {
    Plugin(PluginType),
    Adapter(ExternalAdapterKey),
}

/// Serialized footprint of one record: header bytes, then payload bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub id: RecordId,
    pub header_len: u64,
    pub data_len: u64,
}

impl Slot {
    pub fn new(id: RecordId, header_len: u64, data_len: u64) -> Self {
        Self {
            id,
            header_len,
            data_len,
        }
    }

    pub fn total_len(&self) -> Result<u64> {
        self.header_len
            .checked_add(self.data_len)
            .ok_or_else(|| error!(RegistryError::NumericalOverflow))
    }
}

/// Where a record sits in the account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub id: RecordId,
    pub offset: u64,
    pub data_offset: u64,
    pub data_len: u64,
}

impl Placement {
    pub fn header_len(&self) -> u64 {
        self.data_offset - self.offset
    }

    pub fn end(&self) -> Result<u64> {
        self.data_offset
            .checked_add(self.data_len)
            .ok_or_else(|| error!(RegistryError::NumericalOverflow))
    }
}

/// Packed, gap-free sequence of records starting at `start`.
///
/// Only sizes are stored; offsets are always derived by folding the sizes in
/// physical order, so moving one record never requires patching the others.
/// New records are appended after the existing ones unless inserted at an
/// explicit position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryLayout {
    start: u64,
    slots: Vec<Slot>,
}

impl RegistryLayout {
    pub fn new(start: u64) -> Self {
        Self {
            start,
            slots: Vec::new(),
        }
    }

    /// Rebuild a layout from decoded placements, rejecting gaps, overlaps
    /// and a registry that does not start right after the last record.
    pub fn from_placements(start: u64, mut placements: Vec<Placement>, end: u64) -> Result<Self> {
        placements.sort_by_key(|placement| placement.offset);

        let mut layout = Self::new(start);
        let mut cursor = start;
        for placement in placements {
            require!(placement.offset == cursor, RegistryError::LayoutInvariant);
            require!(
                placement.data_offset > placement.offset,
                RegistryError::LayoutInvariant
            );
            require!(!layout.contains(&placement.id), RegistryError::LayoutInvariant);

            layout.slots.push(Slot::new(
                placement.id,
                placement.header_len(),
                placement.data_len,
            ));
            cursor = placement.end()?;
        }
        require!(cursor == end, RegistryError::LayoutInvariant);

        Ok(layout)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.slots.iter().any(|slot| slot.id == *id)
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.slots
            .iter()
            .position(|slot| slot.id == *id)
            .ok_or_else(|| error!(RegistryError::PluginNotFound))
    }

    /// Bytes occupied by all records.
    pub fn size(&self) -> Result<u64> {
        self.slots.iter().try_fold(0u64, |total, slot| {
            total
                .checked_add(slot.total_len()?)
                .ok_or_else(|| error!(RegistryError::NumericalOverflow))
        })
    }

    /// First byte after the last record.
    pub fn end(&self) -> Result<u64> {
        self.start
            .checked_add(self.size()?)
            .ok_or_else(|| error!(RegistryError::NumericalOverflow))
    }

    pub fn placements(&self) -> Result<Vec<Placement>> {
        let mut cursor = self.start;
        let mut placements = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let data_offset = cursor
                .checked_add(slot.header_len)
                .ok_or(RegistryError::NumericalOverflow)?;
            let placement = Placement {
                id: slot.id,
                offset: cursor,
                data_offset,
                data_len: slot.data_len,
            };
            cursor = placement.end()?;
            placements.push(placement);
        }
        Ok(placements)
    }

    pub fn placement(&self, id: &RecordId) -> Result<Placement> {
        self.placements()?
            .into_iter()
            .find(|placement| placement.id == *id)
            .ok_or_else(|| error!(RegistryError::PluginNotFound))
    }

    /// Move the whole region, e.g. after the account's base record changed size.
    pub fn rebase(&mut self, start: u64) -> Result<()> {
        self.start = start;
        self.verify()
    }

    /// Insert `slot` before the record currently at index `at`; that record
    /// and everything after it shift forward by the new record's size.
    /// Returns the number of bytes the region grew by.
    pub fn insert(&mut self, at: usize, slot: Slot) -> Result<u64> {
        require!(at <= self.slots.len(), RegistryError::LayoutInvariant);
        require!(slot.header_len > 0, RegistryError::LayoutInvariant);
        require!(!self.contains(&slot.id), RegistryError::DuplicateRecord);

        let grown = slot.total_len()?;
        self.slots.insert(at, slot);
        self.verify()?;
        Ok(grown)
    }

    pub fn push(&mut self, slot: Slot) -> Result<u64> {
        self.insert(self.slots.len(), slot)
    }

    /// Remove every record in `ids` in one pass; later records shift back by
    /// the combined size. Returns the number of bytes released.
    pub fn remove(&mut self, ids: &[RecordId]) -> Result<u64> {
        for id in ids {
            self.position(id)?;
        }

        let mut released = 0u64;
        let mut kept = Vec::with_capacity(self.slots.len());
        for slot in self.slots.drain(..) {
            if ids.contains(&slot.id) {
                released = released
                    .checked_add(slot.total_len()?)
                    .ok_or(RegistryError::NumericalOverflow)?;
            } else {
                kept.push(slot);
            }
        }
        self.slots = kept;
        self.verify()?;
        Ok(released)
    }

    /// Change a record's payload length. Its own offsets stay put; only its
    /// successors move, by the returned delta.
    pub fn resize(&mut self, id: &RecordId, data_len: u64) -> Result<i64> {
        let index = self.position(id)?;
        let delta = signed_delta(self.slots[index].data_len, data_len)?;
        self.slots[index].data_len = data_len;
        self.verify()?;
        Ok(delta)
    }

    /// Change a record's header length, moving its payload and successors.
    pub fn resize_header(&mut self, id: &RecordId, header_len: u64) -> Result<i64> {
        require!(header_len > 0, RegistryError::LayoutInvariant);
        let index = self.position(id)?;
        let delta = signed_delta(self.slots[index].header_len, header_len)?;
        self.slots[index].header_len = header_len;
        self.verify()?;
        Ok(delta)
    }

    /// Records are contiguous, non-empty and in strictly increasing order.
    pub fn verify(&self) -> Result<()> {
        let placements = self.placements()?;
        let mut cursor = self.start;
        for placement in &placements {
            require!(placement.offset == cursor, RegistryError::LayoutInvariant);
            require!(
                placement.data_offset > placement.offset,
                RegistryError::LayoutInvariant
            );
            cursor = placement.end()?;
        }
        require!(cursor == self.end()?, RegistryError::LayoutInvariant);
        Ok(())
    }
}

/// `new - old` as a signed byte delta.
pub fn signed_delta(old: u64, new: u64) -> Result<i64> {
    if new >= old {
        i64::try_from(new - old).map_err(|_| error!(RegistryError::NumericalOverflow))
    } else {
        i64::try_from(old - new)
            .map(|shrink| -shrink)
            .map_err(|_| error!(RegistryError::NumericalOverflow))
    }
}

/// Apply a signed delta to an unsigned length, failing on underflow.
pub fn apply_delta(len: u64, delta: i64) -> Result<u64> {
    if delta >= 0 {
        len.checked_add(delta.unsigned_abs())
    } else {
        len.checked_sub(delta.unsigned_abs())
    }
    .ok_or_else(|| error!(RegistryError::NumericalOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::LinkedDataKey;
    use crate::state::Authority;

    fn plugin(kind: PluginType) -> RecordId {
        RecordId::Plugin(kind)
    }

    fn offsets(layout: &RegistryLayout) -> Vec<(u64, u64, u64)> {
        layout
            .placements()
            .unwrap()
            .iter()
            .map(|p| (p.offset, p.data_offset, p.data_len))
            .collect()
    }

    #[test]
    fn push_packs_records_back_to_back() {
        let mut layout = RegistryLayout::new(100);
        assert_eq!(layout.push(Slot::new(plugin(PluginType::Royalties), 10, 0)).unwrap(), 10);
        layout.push(Slot::new(plugin(PluginType::Attributes), 5, 3)).unwrap();

        assert_eq!(offsets(&layout), vec![(100, 110, 0), (110, 115, 3)]);
        assert_eq!(layout.end().unwrap(), 118);
    }

    #[test]
    fn insert_shifts_successors_only() {
        let mut layout = RegistryLayout::new(0);
        layout.push(Slot::new(plugin(PluginType::Royalties), 4, 0)).unwrap();
        layout.push(Slot::new(plugin(PluginType::Attributes), 4, 0)).unwrap();

        layout
            .insert(1, Slot::new(plugin(PluginType::FreezeDelegate), 2, 0))
            .unwrap();
        assert_eq!(offsets(&layout), vec![(0, 4, 0), (4, 6, 0), (6, 10, 0)]);
    }

    #[test]
    fn resize_moves_successors_not_self() {
        let section = RecordId::Adapter(ExternalAdapterKey::DataSection(
            LinkedDataKey::LinkedAppData(Authority::Owner),
        ));
        let app_data = RecordId::Adapter(ExternalAdapterKey::AppData(Authority::UpdateAuthority));

        let mut layout = RegistryLayout::new(119);
        layout.push(Slot::new(section, 4, 4)).unwrap();
        layout.push(Slot::new(app_data, 3, 4)).unwrap();
        assert_eq!(offsets(&layout), vec![(119, 123, 4), (127, 130, 4)]);

        assert_eq!(layout.resize(&section, 2).unwrap(), -2);
        assert_eq!(offsets(&layout), vec![(119, 123, 2), (125, 128, 4)]);

        assert_eq!(layout.resize(&section, 6).unwrap(), 4);
        assert_eq!(offsets(&layout), vec![(119, 123, 6), (129, 132, 4)]);

        assert_eq!(layout.remove(&[section]).unwrap(), 10);
        assert_eq!(offsets(&layout), vec![(119, 122, 4)]);
    }

    #[test]
    fn remove_many_is_one_shift() {
        let mut layout = RegistryLayout::new(10);
        let kinds = [
            PluginType::Royalties,
            PluginType::Attributes,
            PluginType::Edition,
            PluginType::UpdateDelegate,
        ];
        for kind in kinds {
            layout.push(Slot::new(plugin(kind), 3, 1)).unwrap();
        }

        let released = layout
            .remove(&[plugin(PluginType::Royalties), plugin(PluginType::Edition)])
            .unwrap();
        assert_eq!(released, 8);
        assert_eq!(offsets(&layout), vec![(10, 13, 1), (14, 17, 1)]);
    }

    #[test]
    fn rejects_duplicates_and_missing_records() {
        let mut layout = RegistryLayout::new(0);
        layout.push(Slot::new(plugin(PluginType::Royalties), 1, 0)).unwrap();
        assert!(layout.push(Slot::new(plugin(PluginType::Royalties), 1, 0)).is_err());
        assert!(layout.remove(&[plugin(PluginType::Attributes)]).is_err());
        assert!(layout.resize(&plugin(PluginType::Attributes), 1).is_err());
        assert!(layout.push(Slot::new(plugin(PluginType::Edition), 0, 0)).is_err());
        assert!(layout.insert(5, Slot::new(plugin(PluginType::Edition), 1, 0)).is_err());
    }

    #[test]
    fn from_placements_detects_gaps_and_overlaps() {
        let a = plugin(PluginType::Royalties);
        let b = plugin(PluginType::Attributes);
        let placement = |id, offset, data_offset, data_len| Placement {
            id,
            offset,
            data_offset,
            data_len,
        };

        let packed = RegistryLayout::from_placements(
            10,
            vec![placement(b, 14, 15, 0), placement(a, 10, 12, 2)],
            15,
        )
        .unwrap();
        assert_eq!(packed.slots()[0].id, a);

        let gap = RegistryLayout::from_placements(
            10,
            vec![placement(a, 10, 12, 2), placement(b, 15, 16, 0)],
            16,
        );
        assert!(gap.is_err());

        let overlap = RegistryLayout::from_placements(
            10,
            vec![placement(a, 10, 12, 2), placement(b, 13, 14, 0)],
            14,
        );
        assert!(overlap.is_err());

        let trailing = RegistryLayout::from_placements(10, vec![placement(a, 10, 12, 2)], 20);
        assert!(trailing.is_err());
    }

    #[test]
    fn deltas_never_underflow() {
        assert_eq!(signed_delta(4, 2).unwrap(), -2);
        assert_eq!(apply_delta(10, -4).unwrap(), 6);
        assert!(apply_delta(3, -4).is_err());
        assert!(apply_delta(u64::MAX, 1).is_err());
    }
}
