use pose_pipeline::ScreenLandmark;

pub const SKELETON_COLOR: u32 = 0x0000_FF00;
pub const LANDMARK_COLOR: u32 = 0x00FF_FFFF;
pub const LANDMARK_RADIUS: i32 = 3;

/// Pairs of landmark indices joined by a bone in the 33-point pose topology.
/// Bones touching index 0 are left out since that landmark is never
/// presented.
pub const POSE_CONNECTIONS: [(usize, usize); 33] = [
    (1, 2),
    (2, 3),
    (3, 7),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

/// Draw a line using Bresenham's algorithm, clipped to the buffer
pub fn draw_line(
    buf: &mut [u32],
    width: usize,
    height: usize,
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    color: u32,
) {
    loop {
        let outcode0 = compute_outcode(x0, y0, width as i32, height as i32);
        let outcode1 = compute_outcode(x1, y1, width as i32, height as i32);

        if (outcode0 | outcode1) == 0 {
            break;
        } else if (outcode0 & outcode1) != 0 {
            // both ends beyond the same edge
            return;
        } else {
            let outcode = if outcode0 != 0 { outcode0 } else { outcode1 };
            let (x, y) = clip_point(x0, y0, x1, y1, outcode, width as i32, height as i32);

            if outcode == outcode0 {
                x0 = x;
                y0 = y;
            } else {
                x1 = x;
                y1 = y;
            }
        }
    }

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        buf[y0 as usize * width + x0 as usize] = color;

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

pub fn draw_filled_circle(
    buf: &mut [u32],
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    radius: i32,
    color: u32,
) {
    let r2 = radius * radius;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                let x = cx + dx;
                let y = cy + dy;
                if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                    buf[y as usize * width + x as usize] = color;
                }
            }
        }
    }
}

/// Draw bones between presented landmarks, then a dot on each landmark.
///
/// Landmarks are expected in window pixel coordinates (top-left origin).
pub fn draw_skeleton(buf: &mut [u32], width: usize, height: usize, landmarks: &[ScreenLandmark]) {
    let find = |index: usize| landmarks.iter().find(|l| l.index == index);

    for (a, b) in POSE_CONNECTIONS {
        if let (Some(a), Some(b)) = (find(a), find(b)) {
            draw_line(
                buf,
                width,
                height,
                a.position.x as i32,
                a.position.y as i32,
                b.position.x as i32,
                b.position.y as i32,
                SKELETON_COLOR,
            );
        }
    }

    for landmark in landmarks {
        draw_filled_circle(
            buf,
            width,
            height,
            landmark.position.x as i32,
            landmark.position.y as i32,
            LANDMARK_RADIUS,
            LANDMARK_COLOR,
        );
    }
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn compute_outcode(x: i32, y: i32, width: i32, height: i32) -> u8 {
    let mut code = INSIDE;
    if x < 0 {
        code |= LEFT;
    } else if x >= width {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y >= height {
        code |= BOTTOM;
    }
    code
}

fn clip_point(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    outcode: u8,
    width: i32,
    height: i32,
) -> (i32, i32) {
    let dx = x1 - x0;
    let dy = y1 - y0;

    if outcode & TOP != 0 {
        (x0 + dx * (0 - y0) / dy, 0)
    } else if outcode & BOTTOM != 0 {
        (x0 + dx * (height - 1 - y0) / dy, height - 1)
    } else if outcode & LEFT != 0 {
        (0, y0 + dy * (0 - x0) / dx)
    } else {
        (width - 1, y0 + dy * (width - 1 - x0) / dx)
    }
}
