#![no_main]

use checker_core::{
    commit_step, resolve_step, ArchitecturalState, CheckerConfig, Decoder, Explorer,
    InstructionImage, PropertyChecker, TransitionSystem,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let _ = Decoder::decode(word, 0);

    let image = InstructionImage::from_bytes(data);
    let state = ArchitecturalState::default();
    let config = CheckerConfig::default();

    if let Ok(step) = resolve_step(&state, &image) {
        let _ = PropertyChecker::check(&state, &step, &config);
        let _ = commit_step(&state, &step);
        let _ = TransitionSystem::successors(&state, &step, &config);
    }

    let bounded = CheckerConfig {
        max_states: 64,
        ..CheckerConfig::default()
    };
    let _ = Explorer::new(&image, bounded).run();
});
