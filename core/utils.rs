use core::mem;

pub trait ZExtract<U>: Sized {
    fn zextract(&self, pos: u32, len: u32) -> U;
}

pub trait SExtract<S>: Sized {
    fn sextract(&self, pos: u32, len: u32) -> S;
}

macro_rules! impl_extract {
    ($($uint:ty = $sint:ty),+ $(,)?) => (
        $(
            impl ZExtract<$uint> for $uint {
                fn zextract(&self, pos: u32, len: u32) -> $uint {
                    let w = mem::size_of::<$uint>() as u32 * 8;
                    (*self as $uint << (w - pos - len)) >> (w - len)
                }
            }

            impl SExtract<$sint> for $uint {
                fn sextract(&self, pos: u32, len: u32) -> $sint {
                    let w = mem::size_of::<$uint>() as u32 * 8;
                    (*self as $uint << (w - pos - len)) as $sint >> (w - len)
                }
            }
        )+
    );
}

impl_extract! {
    u32 = i32,
}

pub fn zextract<U, T: ZExtract<U>>(value: T, pos: u32, len: u32) -> U {
    value.zextract(pos, len)
}

pub fn sextract<S, T: SExtract<S>>(value: T, pos: u32, len: u32) -> S {
    value.sextract(pos, len)
}

/// Single bit at `pos`.
pub fn bit(value: u32, pos: u32) -> bool {
    value >> pos & 1 != 0
}
