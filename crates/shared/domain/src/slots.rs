use crate::model::OptionBinding;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Kinds of scene slots an asset provides, or a profile needs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct SlotKinds: u32 {
        const METAL_MATERIAL = 1 << 0;
        const WOOD_FINISH = 1 << 1;
        const EXTERIOR_METAL = 1 << 2;
        const SOLAR_PANEL = 1 << 3;
        const WALLS = 1 << 4;
        const GLASS = 1 << 5;

        const FINISHES = Self::WOOD_FINISH.bits() | Self::EXTERIOR_METAL.bits();
    }
}

impl SlotKinds {
    /// Slots a binding mutates; `GLASS` is never required.
    #[must_use]
    pub const fn required_by(binding: OptionBinding) -> Self {
        match binding {
            OptionBinding::SidingColor => Self::METAL_MATERIAL,
            OptionBinding::WoodFinish => Self::FINISHES,
            OptionBinding::Wall(_) => Self::WALLS,
            OptionBinding::SolarPanel => Self::SOLAR_PANEL,
        }
    }

    /// Names of the set flags, for log fields.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl From<u32> for SlotKinds {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for SlotKinds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for SlotKinds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WallPosition;

    #[test]
    fn test_required_slots_per_binding() {
        assert_eq!(SlotKinds::required_by(OptionBinding::SidingColor), SlotKinds::METAL_MATERIAL);
        assert_eq!(
            SlotKinds::required_by(OptionBinding::WoodFinish),
            SlotKinds::WOOD_FINISH | SlotKinds::EXTERIOR_METAL
        );
        assert_eq!(
            SlotKinds::required_by(OptionBinding::Wall(WallPosition::new(1, 1))),
            SlotKinds::WALLS
        );
    }

    #[test]
    fn test_names_skip_composites() {
        let kinds = SlotKinds::METAL_MATERIAL | SlotKinds::SOLAR_PANEL;
        assert_eq!(kinds.names(), ["METAL_MATERIAL", "SOLAR_PANEL"]);
    }
}
