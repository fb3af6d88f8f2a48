// Licensed under the Apache-2.0 license

use core::ptr::addr_of;
use intc_driver::axi_intc::AxiINTC;
use intc_driver::routing::InterruptRouter;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable};
use rv32i::csr::{mcause, mie::mie, CSR};

pub type LoopbackRouter = InterruptRouter<'static, AxiINTC>;

/// Set once the routing table is configured. Traps taken before that find
/// every line disabled at the controller.
pub(crate) static mut ROUTER: Option<&'static LoopbackRouter> = None;

/// Trap handler for board/chip specific code.
///
/// # Safety
/// Accesses CSRs.
#[export_name = "_start_trap_rust_from_kernel"]
pub unsafe extern "C" fn start_trap_rust() {
    let mcause = CSR.mcause.extract();
    match mcause::Trap::from(mcause) {
        mcause::Trap::Interrupt(mcause::Interrupt::MachineExternal) => {
            CSR.mie.modify(mie::mext::CLEAR);
            if let Some(router) = *addr_of!(ROUTER) {
                router.dispatch();
            }
            CSR.mie.modify(mie::mext::SET);
        }
        mcause::Trap::Interrupt(interrupt) => {
            panic!("unexpected interrupt: {:?}", interrupt);
        }
        mcause::Trap::Exception(exception) => {
            panic!("fatal exception: {:?}: {:#x}", exception, CSR.mtval.get());
        }
    }
}

/// No processes run on this board, so nothing traps from user mode.
#[export_name = "_disable_interrupt_trap_rust_from_app"]
pub extern "C" fn disable_interrupt_trap_handler(mcause_val: u32) {
    panic!("trap from user mode: {:#x}", mcause_val);
}
