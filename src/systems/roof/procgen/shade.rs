use crate::systems::roof::HexColor;

/// Lightens (positive `percent`) or darkens (negative) every channel by the
/// same amount, `round(2.55 * percent)`, clamped to 0..=255.
///
/// Half-way amounts round toward +inf, so `-12.5` becomes `-12`.
pub fn shade(color: HexColor, percent: f32) -> HexColor {
    let amount = (2.55 * percent as f64 + 0.5).floor() as i32;
    let [r, g, b] = color.channels();
    let adjust = |c: u8| (c as i32 + amount).clamp(0, 255) as u8;
    HexColor::from_channels([adjust(r), adjust(g), adjust(b)])
}

/// `shade` returning RGBA bytes, used by the painters
pub fn shade_rgba(color: HexColor, percent: f32) -> [u8; 4] {
    let [r, g, b] = shade(color, percent).channels();
    [r, g, b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_percent_is_identity() {
        for rgb in [0x000000, 0xFFFFFF, 0x8B4513, 0x2F4F4F, 0x010203] {
            let color = HexColor::from_u32(rgb);
            assert_eq!(shade(color, 0.0), color);
        }
    }

    #[test]
    fn adjusts_every_channel_and_clamps() {
        // 2.55 * 20 = 51
        assert_eq!(shade(HexColor::from_u32(0x8B4513), 20.0), HexColor::from_u32(0xBE7846));
        assert_eq!(shade(HexColor::from_u32(0x8B4513), -60.0), HexColor::from_u32(0x000000));
        assert_eq!(shade(HexColor::from_u32(0xF0F0F0), 50.0), HexColor::from_u32(0xFFFFFF));
    }

    #[test]
    fn small_channels_stay_zero_padded() {
        // 0x10 - 13 = 3 on every channel
        let darker = shade(HexColor::from_u32(0x101010), -5.0);
        assert_eq!(darker.to_string(), "#030303");
        let green_only = shade(HexColor::from_u32(0x001000), -5.0);
        assert_eq!(green_only.to_string(), "#000300");
    }

    #[test]
    fn shade_then_unshade_is_within_one_unit() {
        // channels kept away from 0 and 255 so nothing clamps
        let colors = [0x708090, 0x808080, 0x6E5A4B, 0x8B7355, 0x5F9EA0];
        for rgb in colors {
            for p in [-20.0_f32, -7.3, -1.0, 3.5, 10.0, 25.0] {
                let color = HexColor::from_u32(rgb);
                let back = shade(shade(color, p), -p);
                for (a, b) in color.channels().into_iter().zip(back.channels()) {
                    assert!(
                        (a as i32 - b as i32).abs() <= 1,
                        "{color} shaded by {p} came back as {back}"
                    );
                }
            }
        }
    }
}
