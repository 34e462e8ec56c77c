//! Integration tests for the timeline subsystem.
//!
//! Exercises cross-crate interactions between framecut-core,
//! framecut-media, and framecut-timeline.

use std::time::Duration;

use anyhow::Context;
use framecut_core::format_timecode;
use framecut_media::{MediaInfo, StaticProbe};
use framecut_timeline::{
    spawn_playback, EditError, Gesture, PlaybackEvent, Region, SharedTimeline, Timeline,
    TimelineConfig, TrackKind,
};
use tracing::info;

use crate::init_tracing;

// ── Helpers ────────────────────────────────────────────────────

fn media(path: &str, duration: f64, fps: f64) -> MediaInfo {
    MediaInfo::new(path, duration, (duration * fps).floor() as u64, fps)
}

fn library() -> StaticProbe {
    StaticProbe::new()
        .with(media("media/interview.mp4", 10.0, 30.0))
        .with(media("media/broll.mp4", 6.0, 24.0))
        .with(media("media/music.wav", 45.0, 0.0))
}

// ── Editing scenario ───────────────────────────────────────────

#[test]
fn split_copy_paste_scenario() -> anyhow::Result<()> {
    init_tracing();
    let probe = library();
    let mut tl = Timeline::new();

    let a = tl.add_media(&probe, "media/interview.mp4", "V1", 0.0)?;
    assert_eq!(tl.clip(a).context("clip A")?.frame_count, 300);

    let b = tl.split_clip(a, 4.0)?;
    let head = tl.clip(a).context("head")?.clone();
    let tail = tl.clip(b).context("tail")?.clone();
    assert_eq!((head.start_time, head.duration, head.frame_count), (0.0, 4.0, 120));
    assert_eq!((tail.start_time, tail.duration, tail.frame_count), (4.0, 6.0, 180));

    tl.select(a)?;
    tl.select(b)?;
    assert_eq!(tl.copy()?, 2);
    let pasted = tl.paste(20.0)?;
    info!(pasted = pasted.len(), "Scenario pasted clips");

    let mut starts: Vec<(f64, f64, u64)> = pasted
        .iter()
        .filter_map(|id| tl.clip(*id))
        .map(|c| (c.start_time, c.duration, c.frame_count))
        .collect();
    starts.sort_by(|x, y| x.0.total_cmp(&y.0));
    assert_eq!(starts, vec![(20.0, 4.0, 120), (24.0, 6.0, 180)]);

    assert_eq!(tl.timeline_duration(), 35.0);
    assert_eq!(tl.selection().len(), 2);
    Ok(())
}

#[test]
fn undo_walks_back_through_every_step() -> anyhow::Result<()> {
    init_tracing();
    let probe = library();
    let mut tl = Timeline::new();
    let mut history = vec![tl.clips().to_vec()];

    let a = tl.add_media(&probe, "media/interview.mp4", "V1", 0.0)?;
    history.push(tl.clips().to_vec());
    tl.add_media(&probe, "media/music.wav", "A1", 0.0)?;
    history.push(tl.clips().to_vec());
    tl.split_clip(a, 3.0)?;
    history.push(tl.clips().to_vec());
    tl.move_clip(a, 12.0, "V1")?;
    history.push(tl.clips().to_vec());
    tl.trim_end(a, 13.5)?;
    history.push(tl.clips().to_vec());

    history.pop();
    while let Some(expected) = history.pop() {
        tl.undo()?;
        assert_eq!(tl.clips(), expected.as_slice());
    }
    assert_eq!(tl.undo(), Err(EditError::NothingToUndo));
    Ok(())
}

#[test]
fn undo_then_redo_reaches_same_state() -> anyhow::Result<()> {
    let mut tl = Timeline::new();
    let a = tl.add_clip(&media("a.mp4", 8.0, 25.0), "V1", 1.0)?;
    tl.split_clip(a, 5.0)?;
    let after = tl.clips().to_vec();

    tl.undo()?;
    tl.redo()?;
    assert_eq!(tl.clips(), after.as_slice());
    Ok(())
}

// ── Tracks ─────────────────────────────────────────────────────

#[test]
fn delete_track_removes_only_its_clips() -> anyhow::Result<()> {
    let probe = library();
    let mut tl = Timeline::new();
    tl.add_track("V2", TrackKind::Video)?;
    tl.add_media(&probe, "media/broll.mp4", "V2", 0.0)?;
    tl.add_media(&probe, "media/broll.mp4", "V2", 7.0)?;
    let keep = tl.add_media(&probe, "media/interview.mp4", "V1", 0.0)?;

    let removed = tl.delete_track("V2")?;
    assert_eq!(removed.len(), 2);
    assert_eq!(tl.clips().len(), 1);
    assert!(tl.clip(keep).is_some());
    assert!(tl.clips().iter().all(|c| tl.track(&c.track_name).is_some()));
    Ok(())
}

#[test]
fn last_track_is_protected() -> anyhow::Result<()> {
    let config = TimelineConfig {
        default_tracks: vec![framecut_timeline::TrackSpec::new("Only", TrackKind::Video)],
        ..Default::default()
    };
    let mut tl = Timeline::with_config(config)?;
    assert_eq!(
        tl.delete_track("Only"),
        Err(EditError::LastTrackProtected { name: "Only".into() })
    );
    assert!(!tl.can_undo());
    Ok(())
}

#[test]
fn cross_kind_move_keeps_track() -> anyhow::Result<()> {
    let probe = library();
    let mut tl = Timeline::new();
    let music = tl.add_media(&probe, "media/music.wav", "A1", 0.0)?;

    let outcome = tl.move_clip(music, 2.0, "V1")?;
    assert!(outcome.track_change_rejected);
    assert_eq!(tl.clip(music).context("music")?.track_name, "A1");
    assert_eq!(tl.clip(music).context("music")?.start_time, 2.0);
    Ok(())
}

// ── Media probing ──────────────────────────────────────────────

#[test]
fn unreadable_media_becomes_placeholder() -> anyhow::Result<()> {
    init_tracing();
    let mut tl = Timeline::new();
    let id = tl.add_media(&library(), "media/corrupt.mov", "V1", 0.0)?;

    let clip = tl.clip(id).context("placeholder")?;
    assert!(clip.is_placeholder());
    assert_eq!(clip.duration, tl.config().placeholder_duration);
    assert_eq!(clip.frame_count, 0);

    // Split arithmetic on zero-fps clips stays at zero frames
    let tail = tl.split_clip(id, 0.5)?;
    assert_eq!(tl.clip(tail).context("tail")?.frame_count, 0);
    Ok(())
}

// ── Zoom & geometry ────────────────────────────────────────────

#[test]
fn zoom_rederives_all_extents() -> anyhow::Result<()> {
    let mut tl = Timeline::new();
    let a = tl.add_clip(&media("a.mp4", 2.0, 30.0), "V1", 3.0)?;
    tl.move_playhead(4.0);

    let change = tl.zoom(4.0, 4.0)?;
    assert_eq!(tl.scale(), 400.0);
    assert_eq!(tl.clip_extent_px(a), Some((1200.0, 800.0)));
    assert_eq!(change.scroll_delta(), 1200.0);

    // Clamped at the upper bound
    tl.zoom(10.0, 0.0)?;
    assert_eq!(tl.scale(), 500.0);
    assert_eq!(tl.playhead_time(), 4.0);
    Ok(())
}

#[test]
fn grid_snap_depends_on_zoom() -> anyhow::Result<()> {
    let mut tl = Timeline::new();
    tl.zoom(0.1, 0.0)?;
    // 10 px/s with a 10 px grid: whole seconds
    let a = tl.add_clip(&media("a.mp4", 2.0, 30.0), "V1", 3.4)?;
    assert_eq!(tl.clip(a).context("clip")?.start_time, 3.0);
    Ok(())
}

// ── Gestures ───────────────────────────────────────────────────

#[test]
fn rubber_band_then_drag_moves_group() -> anyhow::Result<()> {
    let mut tl = Timeline::new();
    let a = tl.add_clip(&media("a.mp4", 2.0, 30.0), "V1", 0.0)?;
    let b = tl.add_clip(&media("b.wav", 2.0, 0.0), "A1", 3.0)?;
    let far = tl.add_clip(&media("c.mp4", 2.0, 30.0), "V1", 9.0)?;

    tl.begin_region_select(0.5, 0.1, false)?;
    tl.update_region_select(4.0, 1.9)?;
    tl.end_gesture()?;
    assert!(tl.is_selected(a) && tl.is_selected(b));
    assert!(!tl.is_selected(far));

    tl.begin_clip_drag(a, false)?;
    tl.update_clip_drag(2.0, 0)?;
    let finished = tl.end_gesture()?;
    assert!(matches!(finished, Gesture::ClipDrag(_)));

    assert_eq!(tl.clip(a).context("a")?.start_time, 2.0);
    assert_eq!(tl.clip(b).context("b")?.start_time, 5.0);
    assert_eq!(tl.clip(far).context("far")?.start_time, 9.0);

    tl.undo()?;
    assert_eq!(tl.clip(a).context("a")?.start_time, 0.0);
    assert_eq!(tl.clip(b).context("b")?.start_time, 3.0);
    Ok(())
}

#[test]
fn region_query_excludes_abutting_clips() -> anyhow::Result<()> {
    let mut tl = Timeline::new();
    let inside = tl.add_clip(&media("a.mp4", 2.0, 30.0), "V1", 1.0)?;
    tl.add_clip(&media("b.mp4", 2.0, 30.0), "V1", 5.0)?;

    let hits = tl.clips_intersecting_region(&Region::new(5.0, 0.0, 1.0, 0.0));
    assert_eq!(hits, vec![inside]);
    Ok(())
}

// ── Playback ───────────────────────────────────────────────────

#[test]
fn timecode_tracks_playhead() {
    let mut tl = Timeline::new();
    tl.move_playhead(12.5);
    assert_eq!(tl.timecode(), "00:00:12:15");
    assert_eq!(tl.timecode(), format_timecode(12.5, 30.0));
}

#[test]
fn shared_playback_walks_across_clips() -> anyhow::Result<()> {
    init_tracing();
    let config = TimelineConfig {
        min_duration: 0.0,
        trailing_padding: 0.1,
        ..Default::default()
    };
    let mut tl = Timeline::with_config(config)?;
    let first = tl.add_clip(&media("a.mp4", 0.1, 30.0), "V1", 0.1)?;
    let second = tl.add_clip(&media("b.mp4", 0.1, 30.0), "V1", 0.3)?;
    tl.play();

    let shared = SharedTimeline::new(tl);
    let playback = spawn_playback(shared.clone(), Duration::from_millis(2))?;
    let mut events = Vec::new();
    while let Ok(event) = playback.events().recv_timeout(Duration::from_secs(5)) {
        events.push(event);
        if event == PlaybackEvent::Finished {
            break;
        }
    }
    playback.stop();

    let changes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::ActiveClipChanged(id) => Some(*id),
            PlaybackEvent::Finished => None,
        })
        .collect();
    let first_pos = changes.iter().position(|id| *id == Some(first));
    let second_pos = changes.iter().position(|id| *id == Some(second));
    assert!(first_pos.is_some() && second_pos.is_some());
    assert!(first_pos < second_pos);
    assert_eq!(events.last(), Some(&PlaybackEvent::Finished));
    Ok(())
}

// ── Configuration ──────────────────────────────────────────────

#[test]
fn config_file_drives_timeline() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("framecut-config-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        br#"{ "undo_depth": 3, "default_tracks": [{"name": "Cam", "kind": "video"}] }"#,
    )?;
    let config = TimelineConfig::load_from_file(&path);
    std::fs::remove_file(&path)?;
    let mut tl = Timeline::with_config(config?)?;

    assert_eq!(tl.tracks().len(), 1);
    for i in 0..5 {
        tl.add_clip(&media("a.mp4", 1.0, 30.0), "Cam", i as f64)?;
    }
    assert_eq!(tl.undo_depth(), 3);
    Ok(())
}
