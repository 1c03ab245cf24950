use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scrollmap::core::{BasicSprite, BufferedRenderer, GridMapData, ScrollGroup, Surface};
use scrollmap::types::{Point, Rect, Rgba, Size};

fn world() -> GridMapData {
    let mut map = GridMapData::new(256, 256, 16, 16).unwrap();
    let mut tiles = Vec::new();
    for i in 0..8u8 {
        let id = map
            .add_tile_image(Surface::filled(16, 16, Rgba::rgb(i * 30, 120, 255 - i * 30)))
            .unwrap();
        tiles.push(id);
    }
    let mut leaf = Surface::new(16, 16);
    leaf.fill_rect(Rect::new(4, 4, 8, 8), Rgba::rgb(20, 90, 20));
    let leaf = map.add_tile_image(leaf).unwrap();

    let ground = map.add_layer("ground");
    let top = map.add_layer("top");
    for y in 0..256 {
        for x in 0..256 {
            let t = tiles[((x * 3 + y * 5) % 8) as usize];
            map.set_tile(x, y, ground, Some(t)).unwrap();
            if (x ^ y) % 7 == 0 {
                map.set_tile(x, y, top, Some(leaf)).unwrap();
            }
        }
    }
    map
}

fn bench_continuous_scroll(c: &mut Criterion) {
    let map = world();
    let mut r = BufferedRenderer::new(&map, Size::new(320, 240)).unwrap();
    let mut frame = Surface::new(320, 240);
    r.center(Point::new(1000.0, 1000.0));
    let mut dir = 1.0;

    c.bench_function("scroll_3px_and_draw_320x240", |b| {
        b.iter(|| {
            if r.center_point().x > 3000.0 || r.center_point().x < 1000.0 {
                dir = -dir;
            }
            r.scroll(black_box(Point::new(3.0 * dir, 1.0 * dir)));
            r.draw(&mut frame, None);
        })
    });
}

fn bench_teleport(c: &mut Criterion) {
    let map = world();
    let mut r = BufferedRenderer::new(&map, Size::new(320, 240)).unwrap();
    let mut flip = false;

    c.bench_function("teleport_full_redraw_320x240", |b| {
        b.iter(|| {
            flip = !flip;
            let p = if flip { 500.0 } else { 3500.0 };
            r.center(black_box(Point::new(p, p)));
        })
    });
}

fn bench_group_draw(c: &mut Criterion) {
    let map = world();
    let renderer = BufferedRenderer::new(&map, Size::new(320, 240)).unwrap();
    let mut group = ScrollGroup::new(renderer);
    for i in 0..50 {
        let (x, y) = (900 + (i * 37) % 300, 900 + (i * 53) % 220);
        group.add_to_layer(
            BasicSprite::new(Surface::filled(12, 16, Rgba::WHITE), x, y),
            (i % 2) as usize,
        );
    }
    group.center(Point::new(1050.0, 1010.0));
    let mut frame = Surface::new(320, 240);

    c.bench_function("group_draw_50_sprites", |b| {
        b.iter(|| {
            group.draw(black_box(&mut frame)).unwrap();
        })
    });
}

criterion_group!(benches, bench_continuous_scroll, bench_teleport, bench_group_draw);
criterion_main!(benches);
