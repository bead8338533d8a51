#![no_main]

use libfuzzer_sys::fuzz_target;
use trellis_grid::{ComponentGeometry, ComponentId, GridSynthesizer, RectF, Size};

fuzz_target!(|data: &[u8]| {
    // Eight bytes per component: x, y, width, height as signed 16-bit values.
    let components: Vec<ComponentGeometry> = data
        .chunks_exact(8)
        .take(64)
        .enumerate()
        .map(|(index, chunk)| {
            let value = |at: usize| f64::from(i16::from_le_bytes([chunk[at], chunk[at + 1]]));
            ComponentGeometry::new(
                ComponentId::new(index as u64),
                RectF::new(value(0), value(2), value(4), value(6)),
            )
        })
        .collect();

    let synthesis = GridSynthesizer::default().synthesize(&components, Size::new(4096, 4096));
    synthesis.model.validate().expect("synthesized grid invalid");
    assert_eq!(
        synthesis.model.assignments().len() + synthesis.rejected.len(),
        components.len(),
        "every component is placed or rejected"
    );
});
