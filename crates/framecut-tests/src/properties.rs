//! Property tests over random edit sequences.

use framecut_media::MediaInfo;
use framecut_timeline::{Region, Timeline, TrackKind};
use proptest::prelude::*;
use uuid::Uuid;

fn media(duration: f64, fps: f64) -> MediaInfo {
    MediaInfo::new("media/prop.mp4", duration, (duration * fps).floor() as u64, fps)
}

#[derive(Debug, Clone)]
enum Op {
    AddTrack { audio: bool, number: u8 },
    DeleteTrack { pick: usize },
    ToggleMute { pick: usize },
    Add { start: f64, duration: f64, track: usize },
    Move { pick: usize, start: f64, track: usize },
    Split { pick: usize, fraction: f64 },
    TrimStart { pick: usize, fraction: f64 },
    TrimEnd { pick: usize, fraction: f64 },
    Delete { pick: usize },
    DeleteSelected,
    ClearClips,
    Select { pick: usize },
    Copy,
    Paste(f64),
    Drag { pick: usize, delta: f64, lanes: isize },
    Playhead(f64),
    Undo,
    Redo,
}

impl Op {
    fn is_history(&self) -> bool {
        matches!(self, Op::Undo | Op::Redo)
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 2u8..5).prop_map(|(audio, number)| Op::AddTrack { audio, number }),
        any::<usize>().prop_map(|pick| Op::DeleteTrack { pick }),
        any::<usize>().prop_map(|pick| Op::ToggleMute { pick }),
        (0.0f64..60.0, 0.1f64..20.0, any::<usize>())
            .prop_map(|(start, duration, track)| Op::Add { start, duration, track }),
        (any::<usize>(), 0.0f64..60.0, any::<usize>())
            .prop_map(|(pick, start, track)| Op::Move { pick, start, track }),
        (any::<usize>(), 0.05f64..0.95).prop_map(|(pick, fraction)| Op::Split { pick, fraction }),
        (any::<usize>(), 0.05f64..0.95).prop_map(|(pick, fraction)| Op::TrimStart { pick, fraction }),
        (any::<usize>(), 0.05f64..0.95).prop_map(|(pick, fraction)| Op::TrimEnd { pick, fraction }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
        Just(Op::DeleteSelected),
        Just(Op::ClearClips),
        any::<usize>().prop_map(|pick| Op::Select { pick }),
        Just(Op::Copy),
        (-5.0f64..80.0).prop_map(Op::Paste),
        (any::<usize>(), -10.0f64..10.0, -2isize..3)
            .prop_map(|(pick, delta, lanes)| Op::Drag { pick, delta, lanes }),
        (-10.0f64..100.0).prop_map(Op::Playhead),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn pick(tl: &Timeline, index: usize) -> Option<Uuid> {
    let clips = tl.clips();
    (!clips.is_empty()).then(|| clips[index % clips.len()].id)
}

fn pick_track(tl: &Timeline, index: usize) -> String {
    let tracks = tl.tracks();
    tracks[index % tracks.len()].name.clone()
}

/// Point `fraction` of the way through a clip.
fn inside(tl: &Timeline, id: Uuid, fraction: f64) -> Option<f64> {
    tl.clip(id).map(|c| c.start_time + c.duration * fraction)
}

/// Apply `op`, ignoring refused commands. Refusals are part of the model.
fn apply(tl: &mut Timeline, op: &Op) {
    match *op {
        Op::AddTrack { audio, number } => {
            let (name, kind) = if audio {
                (format!("A{number}"), TrackKind::Audio)
            } else {
                (format!("V{number}"), TrackKind::Video)
            };
            let _ = tl.add_track(&name, kind);
        }
        Op::DeleteTrack { pick } => {
            let name = pick_track(tl, pick);
            let _ = tl.delete_track(&name);
        }
        Op::ToggleMute { pick } => {
            let name = pick_track(tl, pick);
            let muted = tl.track(&name).map(|t| t.muted).unwrap_or(false);
            let _ = tl.set_track_muted(&name, !muted);
        }
        Op::Add { start, duration, track } => {
            let name = pick_track(tl, track);
            let _ = tl.add_clip(&media(duration, 30.0), &name, start);
        }
        Op::Move { pick: p, start, track } => {
            let name = pick_track(tl, track);
            if let Some(id) = pick(tl, p) {
                let _ = tl.move_clip(id, start, &name);
            }
        }
        Op::Split { pick: p, fraction } => {
            if let Some((id, at)) = pick(tl, p).and_then(|id| Some((id, inside(tl, id, fraction)?))) {
                let _ = tl.split_clip(id, at);
            }
        }
        Op::TrimStart { pick: p, fraction } => {
            if let Some((id, at)) = pick(tl, p).and_then(|id| Some((id, inside(tl, id, fraction)?))) {
                let _ = tl.trim_start(id, at);
            }
        }
        Op::TrimEnd { pick: p, fraction } => {
            if let Some((id, at)) = pick(tl, p).and_then(|id| Some((id, inside(tl, id, fraction)?))) {
                let _ = tl.trim_end(id, at);
            }
        }
        Op::Delete { pick: p } => {
            if let Some(id) = pick(tl, p) {
                tl.delete_clip(id);
            }
        }
        Op::DeleteSelected => {
            tl.delete_selected();
        }
        Op::ClearClips => tl.clear_clips(),
        Op::Select { pick: p } => {
            if let Some(id) = pick(tl, p) {
                let _ = tl.select(id);
            }
        }
        Op::Copy => {
            let _ = tl.copy();
        }
        Op::Paste(target) => {
            let _ = tl.paste(target);
        }
        Op::Drag { pick: p, delta, lanes } => {
            if let Some(id) = pick(tl, p) {
                if tl.begin_clip_drag(id, true).is_ok() {
                    let _ = tl.update_clip_drag(delta, lanes);
                    let _ = tl.end_gesture();
                }
            }
        }
        Op::Playhead(t) => {
            tl.move_playhead(t);
        }
        Op::Undo => {
            let _ = tl.undo();
        }
        Op::Redo => {
            let _ = tl.redo();
        }
    }
}

fn assert_consistent(tl: &Timeline) {
    assert!(!tl.tracks().is_empty());
    for clip in tl.clips() {
        assert!(clip.duration > 0.0, "clip {} has duration {}", clip.id, clip.duration);
        assert!(clip.start_time >= 0.0);
        assert!(tl.track(&clip.track_name).is_some());
    }
    for id in tl.selection() {
        assert!(tl.clip(*id).is_some(), "stale selection id {id}");
    }
    let t = tl.playhead_time();
    assert!(t >= 0.0 && t <= tl.timeline_duration());
    let lanes: Vec<usize> = tl.tracks().iter().map(|t| t.order_index).collect();
    assert_eq!(lanes, (0..tl.tracks().len()).collect::<Vec<_>>());
}

proptest! {
    #[test]
    fn random_edits_keep_state_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let mut tl = Timeline::new();
        for op in &ops {
            apply(&mut tl, op);
            assert_consistent(&tl);
        }
    }

    #[test]
    fn undo_reverses_any_single_edit(
        setup in prop::collection::vec(op(), 0..15),
        edit in op(),
    ) {
        let mut tl = Timeline::new();
        for op in &setup {
            apply(&mut tl, op);
        }
        let tracks = tl.tracks().to_vec();
        let clips = tl.clips().to_vec();
        let depth = tl.undo_depth();
        apply(&mut tl, &edit);

        if !edit.is_history() && tl.undo_depth() > depth {
            tl.undo().unwrap();
            prop_assert_eq!(tl.tracks(), tracks.as_slice());
            prop_assert_eq!(tl.clips(), clips.as_slice());
            assert_consistent(&tl);
        }
    }

    #[test]
    fn split_conserves_duration_and_frames(
        duration in 0.1f64..120.0,
        fps in prop::sample::select(vec![23.976, 24.0, 25.0, 29.97, 30.0, 60.0]),
        fraction in 0.05f64..0.95,
    ) {
        let mut tl = Timeline::new();
        let source = media(duration, fps);
        let head = tl.add_clip(&source, "V1", 0.0).unwrap();
        let tail = tl.split_clip(head, duration * fraction).unwrap();

        let h = tl.clip(head).unwrap();
        let t = tl.clip(tail).unwrap();
        prop_assert!((h.duration + t.duration - duration).abs() < 1e-9);
        prop_assert_eq!(h.frame_count + t.frame_count, source.frame_count);
        prop_assert_eq!(h.end(), t.start_time);
    }

    #[test]
    fn added_clips_land_on_grid(hint in 0.0f64..500.0, zoom in 0.1f64..5.0) {
        let mut tl = Timeline::new();
        tl.zoom(zoom, 0.0).unwrap();
        let id = tl.add_clip(&media(1.0, 30.0), "V1", hint).unwrap();

        let cells = tl.clip(id).unwrap().start_time * tl.scale() / tl.config().grid_px;
        prop_assert!((cells - cells.round()).abs() < 1e-6);
    }

    #[test]
    fn zoom_and_inverse_restore_geometry(factor in 0.2f64..5.0, duration in 0.1f64..30.0) {
        let mut tl = Timeline::new();
        let id = tl.add_clip(&media(duration, 30.0), "V1", 2.0).unwrap();
        let before = tl.clip_extent_px(id).unwrap();

        tl.zoom(factor, 1.0).unwrap();
        tl.zoom(1.0 / factor, 1.0).unwrap();
        let after = tl.clip_extent_px(id).unwrap();

        prop_assert!((tl.scale() - 100.0).abs() < 1e-9);
        prop_assert!((before.0 - after.0).abs() < 1e-6);
        prop_assert!((before.1 - after.1).abs() < 1e-6);
    }

    #[test]
    fn paste_preserves_relative_offsets(
        starts in prop::collection::vec(0.0f64..50.0, 1..6),
        target in 0.0f64..100.0,
    ) {
        let mut tl = Timeline::new();
        let mut ids = Vec::new();
        for start in &starts {
            ids.push(tl.add_clip(&media(1.0, 30.0), "V1", *start).unwrap());
        }
        for id in &ids {
            tl.select(*id).unwrap();
        }
        let originals: Vec<f64> = ids.iter().map(|id| tl.clip(*id).unwrap().start_time).collect();
        let min_original = originals.iter().cloned().fold(f64::INFINITY, f64::min);

        tl.copy().unwrap();
        let pasted = tl.paste(target).unwrap();
        let placed: Vec<f64> = pasted.iter().map(|id| tl.clip(*id).unwrap().start_time).collect();
        let min_placed = placed.iter().cloned().fold(f64::INFINITY, f64::min);

        prop_assert!((min_placed - target).abs() < 1e-9);
        for (o, p) in originals.iter().zip(&placed) {
            prop_assert!(((p - min_placed) - (o - min_original)).abs() < 1e-9);
        }
    }

    #[test]
    fn region_never_selects_abutting_clip(start in 0.0f64..50.0, lanes in 0.0f64..0.99) {
        let mut tl = Timeline::new();
        let id = tl.add_clip(&media(2.0, 30.0), "V1", start).unwrap();
        let clip_start = tl.clip(id).unwrap().start_time;

        // Band ends exactly where the clip begins
        let hits = tl.clips_intersecting_region(&Region::new(0.0, clip_start, 0.0, lanes + 0.01));
        prop_assert!(!hits.contains(&id));
    }
}
