//! Per-grid well table decoding.
//!
//! Turns the positionally correlated `ZWEL`/`IWEL`/`ICON`/`XCON` arrays of
//! one grid into [`GridWell`] records. All length checks between the
//! arrays and the header sizes happen here; nothing downstream sees the
//! raw arrays.

use rf_core::Ijk;
use rf_restart::RestartSource;
use tracing::debug;

use crate::error::{WellResult, malformed};
use crate::fields::FieldLoader;
use crate::layout::{IntHead, icon, iwel, kw, xcon};
use crate::types::{Completion, GridWell, WellKind};

/// Decode the wells of grid `grid_index` (0 = main grid).
///
/// Wells flagged as absent from this grid are skipped. Present wells
/// appear even when they have no completions. No rate filtering is done.
pub fn read_grid_wells<S: RestartSource + ?Sized>(
    fields: &FieldLoader<'_, S>,
    grid_index: usize,
) -> WellResult<Vec<GridWell>> {
    let head = IntHead::parse(&fields.load_ints(kw::INTEHEAD, grid_index)?)?;
    if head.nwells == 0 {
        debug!(grid_index, "grid declares no wells");
        return Ok(Vec::new());
    }

    let zwel = fields.load_strings(kw::ZWEL, grid_index)?;
    let iwel = fields.load_ints(kw::IWEL, grid_index)?;
    let icon = fields.load_ints(kw::ICON, grid_index)?;
    let xcon = fields.load_doubles(kw::XCON, grid_index)?;

    let slots = slot_count(&head)?;
    check_len(kw::ZWEL, zwel.len(), head.nwells, head.nzwelz)?;
    check_len(kw::IWEL, iwel.len(), head.nwells, head.niwelz)?;
    check_len(kw::ICON, icon.len(), slots, head.niconz)?;
    check_len(kw::XCON, xcon.len(), slots, head.nxconz)?;

    let mut wells = Vec::with_capacity(head.nwells);
    for well in 0..head.nwells {
        let record = &iwel[well * head.niwelz..(well + 1) * head.niwelz];
        let Some(kind) = WellKind::from_type_code(record[iwel::TYPE]) else {
            continue;
        };

        let name = zwel[well * head.nzwelz].trim_end().to_string();
        if name.is_empty() {
            return Err(malformed(
                kw::ZWEL,
                format!("well {} has an empty name", well + 1),
            ));
        }

        let ncon = usize::try_from(record[iwel::NCONN]).map_err(|_| {
            malformed(
                kw::IWEL,
                format!("well {name} has negative completion count {}", record[iwel::NCONN]),
            )
        })?;
        if ncon > head.ncwmax {
            return Err(malformed(
                kw::IWEL,
                format!(
                    "well {name} has {ncon} completions, NCWMAX is {}",
                    head.ncwmax
                ),
            ));
        }

        let first_slot = well * head.ncwmax;
        let completions = (first_slot..first_slot + ncon)
            .map(|slot| decode_completion(&head, &icon, &xcon, slot, grid_index, &name))
            .collect::<WellResult<Vec<_>>>()?;

        wells.push(GridWell {
            name,
            kind,
            completions,
        });
    }

    debug!(
        grid_index,
        declared = head.nwells,
        present = wells.len(),
        "decoded well table"
    );
    Ok(wells)
}

fn decode_completion(
    head: &IntHead,
    icon_items: &[i32],
    xcon_items: &[f64],
    slot: usize,
    grid_index: usize,
    well: &str,
) -> WellResult<Completion> {
    let record = &icon_items[slot * head.niconz..(slot + 1) * head.niconz];
    if record[icon::SEQ] < 1 {
        return Err(malformed(
            kw::ICON,
            format!("well {well} uses empty completion slot {slot}"),
        ));
    }

    let ijk = Ijk::from_one_based([record[icon::I], record[icon::J], record[icon::K]])
        .and_then(|cell| cell.check_within(head.dims))
        .map_err(|e| malformed(kw::ICON, format!("well {well}: {e}")))?;

    Ok(Completion {
        grid_index,
        ijk,
        reservoir_inflow_rate: xcon_items[slot * head.nxconz + xcon::RESV_RATE],
    })
}

fn slot_count(head: &IntHead) -> WellResult<usize> {
    head.nwells
        .checked_mul(head.ncwmax)
        .ok_or_else(|| malformed(kw::INTEHEAD, "NWELLS x NCWMAX overflows"))
}

fn check_len(keyword: &str, len: usize, records: usize, record_len: usize) -> WellResult<()> {
    let need = records
        .checked_mul(record_len)
        .ok_or_else(|| malformed(keyword, "declared size overflows"))?;
    if len < need {
        return Err(malformed(
            keyword,
            format!("{len} items, header declares {records} records of {record_len}"),
        ));
    }
    Ok(())
}
