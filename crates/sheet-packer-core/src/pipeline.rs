use std::fmt::Display;

use tracing::{info, instrument};

use crate::config::Constraints;
use crate::error::Result;
use crate::model::Layout;
use crate::packer::SheetPacker;
use crate::sheet::{Sheet, SpriteSheet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Packs `sheet` with the policy its constraint flags select.
///
/// A fresh `SheetPacker` is built for the call and dropped afterwards.
#[instrument(skip_all)]
pub fn pack_sheet<S: SpriteSheet + ?Sized>(sheet: &mut S) -> Result<()> {
    let constraints = sheet.constraints().clone();
    let mut packer = SheetPacker::for_constraints(&constraints);
    info!(policy = %packer.policy(), "packing sheet");
    packer.pack(sheet, &constraints)
}

/// Packs sizes without building a sheet by hand.
/// Inputs are (key, width, height). Returns the layout with sprites in input order.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    constraints: Constraints,
) -> Result<Layout<String>> {
    let mut sheet: Sheet<String> = Sheet::new(constraints);
    for (key, w, h) in inputs {
        sheet.push_sprite(key.into(), w, h);
    }
    pack_sheet(&mut sheet)?;
    Ok(sheet.to_layout())
}

/// Packs independent sheets, one packer per sheet. Results follow the input order.
///
/// With the `parallel` feature the sheets are packed on the rayon pool.
pub fn pack_sheets<K: Display + Send>(sheets: &mut [Sheet<K>]) -> Vec<Result<()>> {
    #[cfg(feature = "parallel")]
    {
        sheets.par_iter_mut().map(|s| pack_sheet(s)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        sheets.iter_mut().map(|s| pack_sheet(s)).collect()
    }
}
