use criterion::{black_box, criterion_group, criterion_main, Criterion};

use csd_player_core::{MemoryAssets, PlayerConfig, ScenePlayer};

fn stage_assets() -> MemoryAssets {
    MemoryAssets::from_iter([
        (
            "res/jackpot.json",
            csd_test_fixtures::scenes::json("jackpot").expect("jackpot fixture"),
        ),
        (
            "res/widgets/coin.json",
            csd_test_fixtures::scenes::json("coin-widget").expect("coin fixture"),
        ),
        (
            "res/game_sheet.plist",
            csd_test_fixtures::atlases::xml("game-sheet").expect("sheet fixture"),
        ),
    ])
}

fn frame_pass(c: &mut Criterion) {
    c.bench_function("load_scene", |b| {
        b.iter(|| {
            let mut assets = stage_assets();
            let scene = ScenePlayer::load(
                black_box(&mut assets),
                PlayerConfig::default(),
                &["res/jackpot.json"],
            )
            .expect("scene load");
            black_box(scene)
        });
    });

    c.bench_function("update_60fps", |b| {
        let mut assets = stage_assets();
        let mut scene =
            ScenePlayer::load(&mut assets, PlayerConfig::default(), &["res/jackpot.json"])
                .expect("scene load");
        scene.drain_outputs();
        let mut ticket = scene.play("idle").expect("idle");
        b.iter(|| {
            if scene.is_settled(ticket) {
                ticket = scene.play("idle").expect("idle");
            }
            black_box(scene.update(&mut assets, 1.0 / 60.0));
        });
    });
}

criterion_group!(benches, frame_pass);
criterion_main!(benches);
