// Copyright 2019 Karl Sundequist Blomdahl <karl.sundequist.blomdahl@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// A half-precision (IEEE 754 binary16) storage type, used to halve the
/// size of feature tensors shipped to the `Processor` (§3 `InferenceRequest`).
/// Conversions go through `f32` and are not meant to be fast, only compact.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct f16(u16);

impl f16 {
    pub fn to_bits(self) -> u16 {
        self.0
    }

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<f32> for f16 {
    fn from(value: f32) -> Self {
        let bits = value.to_bits();
        let sign = (bits >> 16) & 0x8000;
        let exp = ((bits >> 23) & 0xff) as i32 - 127 + 15;
        let mantissa = bits & 0x7f_ffff;

        let half = if (bits & 0x7fff_ffff) == 0 {
            sign as u16
        } else if exp <= 0 {
            // flushes subnormals and tiny values to zero; features use a
            // bounded range so this never matters in practice.
            sign as u16
        } else if exp >= 0x1f {
            (sign | 0x7c00) as u16
        } else {
            (sign | ((exp as u32) << 10) as u32 | (mantissa >> 13)) as u16
        };

        Self(half)
    }
}

impl From<f16> for f32 {
    fn from(value: f16) -> Self {
        let bits = value.0 as u32;
        let sign = (bits & 0x8000) << 16;
        let exp = (bits >> 10) & 0x1f;
        let mantissa = bits & 0x3ff;

        let full_bits = if exp == 0 {
            if mantissa == 0 {
                sign
            } else {
                // subnormal half -> normalized single precision
                let mut e = -1i32;
                let mut m = mantissa;

                while (m & 0x400) == 0 {
                    m <<= 1;
                    e -= 1;
                }

                let m = (m & 0x3ff) << 13;
                let e = ((e + 127 - 15) as u32) << 23;

                sign | e | m
            }
        } else if exp == 0x1f {
            sign | 0x7f80_0000 | (mantissa << 13)
        } else {
            sign | ((exp + 127 - 15) << 23) | (mantissa << 13)
        };

        f32::from_bits(full_bits)
    }
}

impl fmt::Display for f16 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "{}", f32::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_common_values() {
        for &value in &[0.0f32, 1.0, -1.0, 0.5, -0.5, 7.5, 0.125, 100.0, -361.0] {
            let half = f16::from(value);
            let back = f32::from(half);

            assert!((back - value).abs() < 1e-2, "{} -> {} -> {}", value, half.to_bits(), back);
        }
    }

    #[test]
    fn zero_is_exact() {
        assert_eq!(f32::from(f16::from(0.0f32)), 0.0f32);
    }
}
