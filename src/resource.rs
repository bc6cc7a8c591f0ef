use crate::types::ResourceId;

const RESOURCE_OFFSET: u64 = 0xC400_0000;
const VERSION_STEP: u64 = 0x0100_0000;

/// Reduces a (possibly masked) resource ID to the base ID of the item definition.
///
/// Special versions of a card share the base ID of the regular card, with the version encoded in
/// the higher bits of the resource ID.
pub fn get_base_id(resource_id: ResourceId) -> ResourceId {
    let mut resource_id = resource_id.saturating_add(RESOURCE_OFFSET);
    let mut version = 0;

    while resource_id > VERSION_STEP {
        version += 1;

        let step = match version {
            1 => 0x8000_0000,
            2 => 0x0300_0000,
            _ => VERSION_STEP,
        };

        resource_id = resource_id.saturating_sub(step);
    }

    resource_id
}
