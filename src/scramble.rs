use rand::Rng;

const GLYPHS: &[char] = &[
    '!', '<', '>', '-', '_', '\\', '/', '[', ']', '{', '}', '—', '=', '+', '*', '^', '?', '#', '_', '_', '_', '_', '_', '_', '_', '_',
];
const MAX_OFFSET: u32 = 40;
const REDRAW_CHANCE: f64 = 0.28;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Settled(char),
    Noise(char),
}

#[derive(Clone, Debug)]
struct Glyph {
    from: Option<char>,
    to: Option<char>,
    start: u32,
    end: u32,
    noise: Option<char>,
}

/// Decodes one string into another through a burst of random glyphs.
#[derive(Clone, Debug)]
pub struct TextScramble {
    queue: Vec<Glyph>,
    frame: u32,
}

impl TextScramble {
    pub fn new<R: Rng>(old: &str, new: &str, rng: &mut R) -> Self {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();
        let length = old.len().max(new.len());

        let queue = (0..length)
            .map(|index| {
                let start = rng.gen_range(0..MAX_OFFSET);
                Glyph {
                    from: old.get(index).copied(),
                    to: new.get(index).copied(),
                    start,
                    end: start + rng.gen_range(0..MAX_OFFSET),
                    noise: None,
                }
            })
            .collect();

        Self { queue, frame: 0 }
    }

    /// Whether the last frame returned by [`tick`](Self::tick) was fully settled.
    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.queue.iter().all(|glyph| self.frame > glyph.end)
    }

    /// Produces the current frame and advances. The second value is true once
    /// every character shows its target.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> (Vec<Cell>, bool) {
        let frame = self.frame;
        let mut settled = 0;
        let mut cells = Vec::with_capacity(self.queue.len());

        for glyph in &mut self.queue {
            if frame >= glyph.end {
                settled += 1;
                cells.extend(glyph.to.map(Cell::Settled));
            } else if frame >= glyph.start {
                let noise = match glyph.noise {
                    Some(noise) if !rng.gen_bool(REDRAW_CHANCE) => noise,
                    _ => GLYPHS[rng.gen_range(0..GLYPHS.len())],
                };
                glyph.noise = Some(noise);
                cells.push(Cell::Noise(noise));
            } else {
                cells.extend(glyph.from.map(Cell::Settled));
            }
        }

        self.frame += 1;
        (cells, settled == self.queue.len())
    }
}
