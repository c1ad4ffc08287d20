//! Reset and clock control (RM0368 §6.3).

pub const CR: usize = 0x00;
pub const PLLCFGR: usize = 0x04;
pub const CFGR: usize = 0x08;
pub const AHB1ENR: usize = 0x30;
pub const APB1ENR: usize = 0x40;
pub const APB2ENR: usize = 0x44;

pub const CR_HSION: u32 = 1 << 0;
pub const CR_HSIRDY: u32 = 1 << 1;
pub const CR_HSEON: u32 = 1 << 16;
pub const CR_HSERDY: u32 = 1 << 17;
pub const CR_HSEBYP: u32 = 1 << 18;

/// System clock switch, bits 1:0.
pub const CFGR_SW_SHIFT: u32 = 0;
/// System clock switch status, bits 3:2.
pub const CFGR_SWS_SHIFT: u32 = 2;
pub const CFGR_SW_WIDTH: u32 = 2;

pub const SW_HSI: u32 = 0b00;
pub const SW_HSE: u32 = 0b01;
pub const SW_PLL: u32 = 0b10;

// AHB1ENR
pub const GPIOAEN: u32 = 1 << 0;
pub const GPIOBEN: u32 = 1 << 1;
pub const GPIOCEN: u32 = 1 << 2;
pub const GPIODEN: u32 = 1 << 3;
pub const GPIOEEN: u32 = 1 << 4;
pub const GPIOHEN: u32 = 1 << 7;

// APB2ENR
pub const TIM1EN: u32 = 1 << 0;
pub const SYSCFGEN: u32 = 1 << 14;
pub const TIM9EN: u32 = 1 << 16;
pub const TIM10EN: u32 = 1 << 17;
pub const TIM11EN: u32 = 1 << 18;
