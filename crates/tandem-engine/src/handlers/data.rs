//! Party data transfer: packed reads, field writes and raw image patches.

use log::warn;
use tandem_core::record::PARTY_IMAGE_LEN;
use tandem_core::{
    BattlerId, CapacityExceeded, MonDataRequest, PartySelector, Pokemon, Presentation, Response,
    MON_DATA_CAPACITY,
};

use crate::battle::Battle;
use crate::controller::Step;

impl<P: Presentation> Battle<P> {
    /// Pack `request` for every selected member into one response.
    ///
    /// Members are packed whole and in ascending slot order. The first
    /// member that would overrun [`MON_DATA_CAPACITY`] and every member
    /// after it are left out; the response then reports the overflow.
    pub(crate) fn get_mon_data(
        &mut self,
        battler: BattlerId,
        request: MonDataRequest,
        selector: PartySelector,
    ) -> Step {
        let width = request.get_width();
        let mut data = Vec::with_capacity(MON_DATA_CAPACITY);
        let mut required = 0usize;
        let mut packed = 0u8;
        let mut fits = true;
        for index in selector.indexes(self.state.party_index(battler)) {
            required += width;
            if fits && data.len() + width <= MON_DATA_CAPACITY {
                let mon = &self.state.party.slots()[index.index()];
                request.encode_get(mon, &*self.species, &mut data);
                packed += 1;
            } else {
                fits = false;
            }
        }
        let overflow = (!fits).then_some(CapacityExceeded {
            capacity: MON_DATA_CAPACITY,
            required,
            packed,
        });
        if let Some(e) = &overflow {
            warn!("battler {battler}: {request:?} truncated: {e}");
        }
        self.emit(battler, Response::MonData { data, overflow });
        Step::Complete
    }

    /// Write `request` into every selected member.
    pub(crate) fn set_mon_data(
        &mut self,
        battler: BattlerId,
        request: MonDataRequest,
        selector: PartySelector,
        data: &[u8],
    ) -> Step {
        for index in selector.indexes(self.state.party_index(battler)) {
            request.apply_set(&mut self.state.party.slots_mut()[index.index()], data);
        }
        let mon = self.state.active(battler);
        self.presentation.update_low_hp_music(battler, mon);
        Step::Complete
    }

    /// Patch bytes of the active member's party image.
    pub(crate) fn set_raw_mon_data(&mut self, battler: BattlerId, offset: u8, bytes: &[u8]) -> Step {
        let start = offset as usize;
        let end = (start + bytes.len()).min(PARTY_IMAGE_LEN);
        if start + bytes.len() > PARTY_IMAGE_LEN {
            warn!(
                "battler {battler}: raw write of {} bytes at {start} runs past the {PARTY_IMAGE_LEN}-byte image, tail dropped",
                bytes.len()
            );
        }
        if start < end {
            let mon = self.state.active_mut(battler);
            let mut image = mon.to_party_image();
            image[start..end].copy_from_slice(&bytes[..end - start]);
            *mon = Pokemon::from_party_image(&image);
        }
        Step::Complete
    }
}
