use bevy::math::Vec2;

/// Scales `natural` to the largest size that fits inside `frame` without changing its
/// aspect ratio. Degenerate sizes collapse to zero.
pub fn fit_into_frame(frame: Vec2, natural: Vec2) -> Vec2 {
    if natural.x <= 0.0 || natural.y <= 0.0 || frame.x <= 0.0 || frame.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (frame.x / natural.x).min(frame.y / natural.y);
    natural * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_is_bounded_by_width() {
        let size = fit_into_frame(Vec2::new(468.0, 458.0), Vec2::new(936.0, 458.0));
        assert_eq!(size, Vec2::new(468.0, 229.0));
    }

    #[test]
    fn tall_image_is_bounded_by_height() {
        let size = fit_into_frame(Vec2::new(304.0, 455.0), Vec2::new(100.0, 910.0));
        assert_eq!(size, Vec2::new(50.0, 455.0));
    }

    #[test]
    fn small_image_is_scaled_up() {
        let size = fit_into_frame(Vec2::new(200.0, 200.0), Vec2::new(50.0, 25.0));
        assert_eq!(size, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn degenerate_sizes() {
        assert_eq!(fit_into_frame(Vec2::new(200.0, 200.0), Vec2::new(0.0, 25.0)), Vec2::ZERO);
        assert_eq!(fit_into_frame(Vec2::ZERO, Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }
}
