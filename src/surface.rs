use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Immediate-mode drawing target. The draw colour sticks until changed.
pub trait DrawSurface {
    fn set_draw_color(&mut self, r: u8, g: u8, b: u8, a: u8);
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32);
    /// Fill the whole target with the current draw colour.
    fn clear(&mut self);
    /// Make everything drawn since the last present visible at once.
    fn present(&mut self);
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0RGB, what softbuffer expects
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// Software surface: draws into `back`, `present` swaps it to `front`.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    back: Vec<u32>,
    front: Vec<u32>,
    color: u32,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            back: vec![0; width * height],
            front: vec![0; width * height],
            color: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Last presented frame.
    pub fn front(&self) -> &[u32] {
        &self.front
    }
}

impl DrawSurface for FrameBuffer {
    fn set_draw_color(&mut self, r: u8, g: u8, b: u8, _a: u8) {
        // Everything is drawn opaque, alpha is ignored.
        self.color = pack_rgb(r, g, b);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let x0 = x.clamp(0, self.width as i32) as usize;
        let y0 = y.clamp(0, self.height as i32) as usize;
        let x1 = (x as i64 + w as i64).clamp(0, self.width as i64) as usize;
        let y1 = (y as i64 + h as i64).clamp(0, self.height as i64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            let start = row * self.width;
            self.back[start + x0..start + x1].fill(self.color);
        }
    }

    fn clear(&mut self) {
        self.back.fill(self.color);
    }

    fn present(&mut self) {
        std::mem::swap(&mut self.back, &mut self.front);
    }
}

/// Nearest-neighbour stretch of `src` onto `dst`, rows in parallel.
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, sh: usize) {
    if dw == 0 || sw == 0 || sh == 0 {
        return;
    }
    let dh = dst.len() / dw;
    if dh == 0 {
        return;
    }

    if dw == sw && dh == sh {
        dst.copy_from_slice(&src[..dw * dh]);
        return;
    }

    let xs: Vec<usize> = (0..dw).map(|x| x * sw / dw).collect();
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let src_row = &src[(y * sh / dh) * sw..][..sw];
        for (d, &sx) in dst_row.iter_mut().zip(&xs) {
            *d = src_row[sx];
        }
    });
}
