// STM32F401 vector table positions (RM0368 table 38).

pub const EXTI0: u32 = 6;
pub const EXTI1: u32 = 7;
pub const EXTI2: u32 = 8;
pub const EXTI3: u32 = 9;
pub const EXTI4: u32 = 10;
pub const EXTI9_5: u32 = 23;
pub const TIM1_BRK_TIM9: u32 = 24;
pub const TIM1_UP_TIM10: u32 = 25;
pub const TIM1_TRG_COM_TIM11: u32 = 26;
pub const EXTI15_10: u32 = 40;
