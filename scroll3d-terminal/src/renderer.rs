/// ASCII presentation of a rendered framebuffer
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use scroll3d_core::{Framebuffer, Stage};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Renders a stage into terminal characters
pub struct AsciiRenderer {
    framebuffer: Framebuffer,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.framebuffer.resize(width, height);
    }

    pub fn render(&mut self, stage: &mut Stage) {
        stage.frame(&mut self.framebuffer);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.framebuffer.rows().enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for pixel in row {
                let c = pixel.map(shade_char).unwrap_or(' ');

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a lit colour to a ramp character by its luminance
pub fn shade_char(rgb: [f32; 3]) -> char {
    let luminance = 0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2];
    // Drawn pixels never map to the blank slot
    let steps = LUMINOSITY_RAMP.len() - 2;
    let index = 1 + (luminance.clamp(0.0, 1.0) * steps as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_char_extremes() {
        assert_eq!(shade_char([0.0, 0.0, 0.0]), '.');
        assert_eq!(shade_char([1.0, 1.0, 1.0]), '@');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }
}
