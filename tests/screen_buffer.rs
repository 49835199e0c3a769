use egui::{Color32, ColorImage};

use eframe_sprite::EditorContext;
use eframe_sprite::document::{Palette, Sprite};
use eframe_sprite::event_loop::IdleFlags;
use eframe_sprite::layer::Layer;
use eframe_sprite::layout::LayoutDirs;
use eframe_sprite::recorder::ScreenRecorder;
use eframe_sprite::screen::{
    DisplaySurface, Flip, PixelRect, ScreenBuffer, update_screen_for_sprite,
};

/// Records what reached the display.
#[derive(Default)]
struct FakeSurface {
    contents: Option<ColorImage>,
    full_blits: usize,
    regions: Vec<([usize; 2], [usize; 2])>,
}

impl DisplaySurface for FakeSurface {
    fn has_contents(&self) -> bool {
        self.contents.is_some()
    }

    fn blit_region(&mut self, origin: [usize; 2], region: ColorImage) {
        self.regions.push((origin, region.size));
    }

    fn blit_full(&mut self, image: &ColorImage, _scale: usize) {
        self.full_blits += 1;
        self.contents = Some(image.clone());
    }
}

fn red_sprite(width: usize, height: usize) -> Sprite {
    let mut sprite = Sprite::new(width, height);
    sprite.layers[0] = Layer::from_pixels("Layer 1", width, height, vec![Color32::RED; width * height]);
    sprite.palette = Palette::new(vec![Color32::RED]);
    sprite
}

#[test]
fn test_first_flip_is_full() {
    let mut screen = ScreenBuffer::new([640, 400], 2);
    assert_eq!(screen.size(), [320, 200]);
    assert!(screen.is_double_buffered());

    let mut surface = FakeSurface::default();
    assert_eq!(screen.flip(&mut surface), Flip::Full { stretched: true });
    assert!(!screen.needs_full_refresh());
    assert_eq!(screen.flip(&mut surface), Flip::Clean);
    assert_eq!(surface.full_blits, 1);
}

#[test]
fn test_dirty_regions_are_merged() {
    let mut screen = ScreenBuffer::default();
    let mut surface = FakeSurface::default();
    screen.flip(&mut surface);

    screen.mark_dirty(PixelRect::new(10, 10, 5, 5));
    screen.mark_dirty(PixelRect::new(30, 20, 10, 2));
    // Clipped to the buffer
    screen.mark_dirty(PixelRect::new(315, 0, 20, 1));
    let expected = PixelRect::new(10, 0, 310, 22);
    assert_eq!(screen.dirty_region(), Some(expected));

    assert_eq!(screen.flip(&mut surface), Flip::Dirty(expected));
    assert_eq!(surface.regions, [([10, 0], [310, 22])]);
    assert_eq!(screen.dirty_region(), None);
}

#[test]
fn test_empty_surface_forces_full_blit() {
    let mut screen = ScreenBuffer::default();
    screen.flip(&mut FakeSurface::default());
    screen.mark_dirty(PixelRect::new(0, 0, 1, 1));

    let mut fresh = FakeSurface::default();
    assert_eq!(screen.flip(&mut fresh), Flip::Full { stretched: false });
    assert!(fresh.regions.is_empty());
}

#[test]
fn test_without_tracking_every_flip_is_full() {
    let mut screen = ScreenBuffer::default();
    screen.set_dirty_tracking(false);
    let mut surface = FakeSurface::default();
    screen.flip(&mut surface);
    screen.mark_dirty(PixelRect::new(0, 0, 1, 1));

    assert_eq!(screen.flip(&mut surface), Flip::Full { stretched: false });
    assert_eq!(surface.full_blits, 2);
}

#[test]
fn test_software_cursor_is_composited_and_restored() {
    let mut screen = ScreenBuffer::new([640, 400], 2);
    let mut surface = FakeSurface::default();
    screen.set_cursor(Some([10, 10]));
    screen.flip(&mut surface);

    // Drawn on the display, not left in the back buffer
    let shown = surface.contents.as_ref().unwrap();
    assert_eq!(shown[(10, 10)], Color32::BLACK);
    assert_eq!(shown[(11, 12)], Color32::WHITE);
    assert_eq!(screen.image()[(10, 10)], Color32::from_gray(64));

    // Unmoved cursor leaves nothing to copy
    assert_eq!(screen.flip(&mut surface), Flip::Clean);

    screen.set_cursor(Some([20, 20]));
    assert_eq!(
        screen.flip(&mut surface),
        Flip::Dirty(PixelRect::new(10, 10, 16, 18))
    );

    screen.set_cursor(None);
    assert_eq!(
        screen.flip(&mut surface),
        Flip::Dirty(PixelRect::new(20, 20, 6, 8))
    );
}

#[test]
fn test_cursor_is_clipped_at_the_edge() {
    let mut screen = ScreenBuffer::new([640, 400], 2);
    let mut surface = FakeSurface::default();
    screen.flip(&mut surface);

    screen.set_cursor(Some([318, 198]));
    assert_eq!(
        screen.flip(&mut surface),
        Flip::Dirty(PixelRect::new(318, 198, 2, 2))
    );
}

#[test]
fn test_single_buffered_screen_has_no_software_cursor() {
    let mut screen = ScreenBuffer::default();
    let mut surface = FakeSurface::default();
    screen.flip(&mut surface);

    screen.set_cursor(Some([5, 5]));
    assert_eq!(screen.flip(&mut surface), Flip::Clean);
}

#[test]
fn test_sprite_is_centered_and_drawn() {
    let mut screen = ScreenBuffer::default();
    let sprite = red_sprite(32, 32);
    assert_eq!(screen.sprite_rect(&sprite), PixelRect::new(144, 84, 32, 32));

    let mut surface = FakeSurface::default();
    screen.flip(&mut surface);
    screen.draw_sprite(&sprite);
    assert_eq!(screen.image()[(144, 84)], Color32::RED);
    assert_eq!(screen.image()[(143, 84)], Color32::from_gray(64));
    assert_eq!(
        screen.flip(&mut surface),
        Flip::Dirty(PixelRect::new(144, 84, 32, 32))
    );
}

#[test]
fn test_palette_change_forces_full_refresh() {
    let mut screen = ScreenBuffer::default();
    let mut surface = FakeSurface::default();
    let mut palette = Palette::default();
    screen.flip(&mut surface);

    let sprite = red_sprite(8, 8);
    assert!(update_screen_for_sprite(Some(&sprite), &mut palette, &mut screen));
    assert_eq!(palette, sprite.palette);
    assert!(screen.needs_full_refresh());
    screen.flip(&mut surface);

    // Same palette: only the sprite area is redrawn
    assert!(!update_screen_for_sprite(Some(&sprite), &mut palette, &mut screen));
    assert!(!screen.needs_full_refresh());
    assert_eq!(screen.dirty_region(), Some(screen.sprite_rect(&sprite)));

    // Closing the sprite restores the default palette
    assert!(update_screen_for_sprite(None, &mut palette, &mut screen));
    assert_eq!(palette, Palette::default());
}

#[test]
fn test_resize_reallocates_and_invalidates() {
    let mut screen = ScreenBuffer::default();
    screen.flip(&mut FakeSurface::default());

    assert!(!screen.resize([320, 200], 1));
    assert!(!screen.needs_full_refresh());

    assert!(screen.resize([1024, 768], 2));
    assert_eq!(screen.size(), [512, 384]);
    assert_eq!(screen.scale(), 2);
    assert!(screen.needs_full_refresh());

    // Scale is kept within 1..=4
    screen.resize([800, 800], 9);
    assert_eq!(screen.scale(), 4);
}

#[test]
fn test_resized_screen_is_redrawn_by_next_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = EditorContext::new(LayoutDirs::default(), ScreenRecorder::new(dir.path()));
    let idle = IdleFlags::new();
    editor.sprite = Some(red_sprite(8, 8));
    editor.refresh_screen();
    assert_eq!(editor.screen.image()[(160, 100)], Color32::RED);

    // Same canvas: nothing to redo
    assert!(!editor.resize_screen([320, 200], 1, &idle));
    assert!(!idle.contains(IdleFlags::REFRESH_FULL_SCREEN));

    assert!(editor.resize_screen([640, 480], 1, &idle));
    assert_eq!(editor.screen.image()[(320, 240)], Color32::from_gray(64));
    assert!(idle.contains(IdleFlags::REFRESH_FULL_SCREEN));

    editor.refresh_screen();
    assert_eq!(editor.screen.image()[(320, 240)], Color32::RED);
}
