// Licensed under the Apache-2.0 license

// Status word of the Aurora 64B/66B serial link, read through a GPIO input.

use crate::hil::LinkStatus;
use kernel::utilities::registers::interfaces::Readable;
use kernel::utilities::StaticRef;
use registers_generated::aurora_status::bits::LinkStatus as Status;
use registers_generated::aurora_status::regs::AuroraStatus;

pub struct AuroraLink {
    registers: StaticRef<AuroraStatus>,
}

impl AuroraLink {
    pub const fn new(base: StaticRef<AuroraStatus>) -> AuroraLink {
        AuroraLink { registers: base }
    }

    pub fn lane_up(&self) -> bool {
        self.registers.status.is_set(Status::LaneUp)
    }
}

impl LinkStatus for AuroraLink {
    fn channel_up(&self) -> bool {
        self.registers.status.is_set(Status::ChannelUp)
    }
}
