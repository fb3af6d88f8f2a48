// Licensed under the Apache-2.0 license

use crate::interrupts::{LoopbackRouter, ROUTER};
use crate::io::{UartWriter, UART_BASE};
use crate::MEMORY_MAP;
use capsules_loopback::error::LoopbackError;
use capsules_loopback::handlers::{IngressHandler, StreamCompletionHandler};
use capsules_loopback::orchestrator::{LoopbackBuffers, LoopbackPeripherals, Orchestrator};
use capsules_loopback::signals::CompletionSignals;
use dma_driver::aurora::AuroraLink;
use dma_driver::axidma::AxiDMA;
use dma_driver::hil::LinkStatus;
use dma_driver::nwl::{NwlIngress, RESET_SETTLE_POLLS};
use fwtime::{println, DmaRegion, NoDataCache};
use intc_driver::axi_iic::ControlBusIrq;
use intc_driver::axi_intc::AxiINTC;
use intc_driver::hil::{IrqSourceControl, IrqSources};
use intc_driver::routing::IrqBindings;
use kernel::static_init;
use kernel::utilities::registers::interfaces::ReadWriteable;
use kernel::utilities::StaticRef;
use loopback_config_fpga::{FPGA_IRQ_LINES, FPGA_TUNING};
use rv32i::csr;

/// Input lines wired to the interrupt controller.
const INTC_LINES: u32 = 4;

#[cfg(feature = "send-pattern")]
const PATTERN_LEN: usize = 0x1000;

pub(crate) static mut CONSOLE: UartWriter = UartWriter::new(UART_BASE);

/// Main function called after RAM initialized.
///
/// # Safety
/// Accesses memory, memory-mapped registers and CSRs.
pub unsafe fn main() {
    // only machine mode
    rv32i::configure_trap_handler();

    #[allow(static_mut_refs)]
    fwtime::set_printer(&mut CONSOLE);
    println!("[loopback] Hello from loopback runtime");

    let map = &MEMORY_MAP;
    let tuning = FPGA_TUNING;

    let nwl: &'static NwlIngress = static_init!(
        NwlIngress,
        NwlIngress::new(StaticRef::new(
            map.nwl_offset as *const registers_generated::nwl_dma::regs::NwlDma
        ))
    );
    nwl.reset_engine(RESET_SETTLE_POLLS);
    println!("[loopback] Ingress bridge reset");

    let axidma: &'static AxiDMA = static_init!(
        AxiDMA,
        AxiDMA::new(
            StaticRef::new(map.axidma_offset as *const registers_generated::axidma::regs::AxiDma),
            tuning.reset_poll_budget,
        )
    );
    if let Err(err) = axidma.init() {
        panic!("[loopback] stream engine init failed: {:?}", err);
    }
    println!("[loopback] Stream engine initialized");

    let intc: &'static AxiINTC = static_init!(
        AxiINTC,
        AxiINTC::new(
            StaticRef::new(map.intc_offset as *const registers_generated::axi_intc::regs::AxiIntc),
            INTC_LINES,
        )
    );
    let control_bus: &'static ControlBusIrq = static_init!(
        ControlBusIrq,
        ControlBusIrq::new(StaticRef::new(
            map.iic_offset as *const registers_generated::axi_iic::regs::AxiIic
        ))
    );
    let link: &'static AuroraLink = static_init!(
        AuroraLink,
        AuroraLink::new(StaticRef::new(
            map.link_status_offset as *const registers_generated::aurora_status::regs::AuroraStatus
        ))
    );
    println!(
        "[loopback] Link lane up: {}, channel up: {}",
        link.lane_up(),
        link.channel_up()
    );

    let signals = static_init!(CompletionSignals, CompletionSignals::new());
    let (notifiers, observer) = signals.split();
    let ingress_handler: &'static IngressHandler<'static> = static_init!(
        IngressHandler<'static>,
        IngressHandler::new(nwl, notifiers.ingress)
    );
    let outbound_handler: &'static StreamCompletionHandler<'static> = static_init!(
        StreamCompletionHandler<'static>,
        StreamCompletionHandler::new(axidma, notifiers.outbound, tuning.reset_poll_budget)
    );
    let inbound_handler: &'static StreamCompletionHandler<'static> = static_init!(
        StreamCompletionHandler<'static>,
        StreamCompletionHandler::new(axidma, notifiers.inbound, tuning.reset_poll_budget)
    );

    let router: &'static LoopbackRouter =
        static_init!(LoopbackRouter, LoopbackRouter::new(intc, FPGA_IRQ_LINES));
    if let Err(err) = router.configure(IrqBindings {
        ingress: ingress_handler,
        outbound: outbound_handler,
        inbound: inbound_handler,
        control_bus,
    }) {
        panic!("[loopback] interrupt routing failed: {:?}", err);
    }
    ROUTER = Some(router);
    control_bus.enable();
    router.enable(IrqSources::CONTROL_BUS);
    println!("[loopback] Interrupts routed");

    csr::CSR.mie.modify(csr::mie::mie::mext::SET);
    csr::CSR.mstatus.modify(csr::mstatus::mstatus::mie::SET);

    let buffers = LoopbackBuffers {
        ingress: DmaRegion::new(map.ingress_offset as usize, map.ingress_size as usize),
        frame_header_offset: map.frame_header_offset as usize,
        rx: DmaRegion::new(map.rx_offset as usize, map.rx_size as usize),
    };
    let cache: &'static NoDataCache = static_init!(NoDataCache, NoDataCache);
    let mut orchestrator = Orchestrator::new(
        LoopbackPeripherals {
            engine: axidma,
            ingress: nwl,
            sources: router,
            cache,
            link,
        },
        observer,
        buffers,
        tuning,
    );

    if let Ok(report) = orchestrator.run_stream_loopback() {
        println!(
            "[loopback] Stream self-test passed, {} bytes",
            report.bytes_received
        );
    }

    run(&mut orchestrator)
}

#[cfg(not(any(feature = "relay-frames", feature = "send-pattern")))]
fn run(orchestrator: &mut Orchestrator<'static>) -> ! {
    let mut passes = 0u32;
    loop {
        match orchestrator.run_ingress_loopback() {
            Ok(report) => {
                passes = passes.wrapping_add(1);
                println!(
                    "[loopback] Pass {}: {} bytes verified, {} received",
                    passes, report.length, report.bytes_received
                );
            }
            Err(LoopbackError::ResetTimeout { .. }) | Err(LoopbackError::EngineUnusable) => {
                recover(orchestrator)
            }
            // reported by the orchestrator; the next frame re-arms
            Err(_) => {}
        }
    }
}

#[cfg(feature = "relay-frames")]
fn run(orchestrator: &mut Orchestrator<'static>) -> ! {
    let console = UartWriter::new(UART_BASE);
    loop {
        println!("[loopback] Relaying (press any key to stop)");
        let stop = || console.key_pressed().is_some();
        if let Err(LoopbackError::ResetTimeout { .. }) | Err(LoopbackError::EngineUnusable) =
            orchestrator.relay_frames(&stop)
        {
            recover(orchestrator);
        }
        while console.key_pressed().is_none() {}
    }
}

#[cfg(all(feature = "send-pattern", not(feature = "relay-frames")))]
fn run(orchestrator: &mut Orchestrator<'static>) -> ! {
    let console = UartWriter::new(UART_BASE);
    loop {
        println!("[loopback] Press any key to send {} bytes", PATTERN_LEN);
        while console.key_pressed().is_none() {}
        match orchestrator.send_pattern(PATTERN_LEN) {
            Ok(sent) => println!("[loopback] Sent {} bytes", sent),
            Err(LoopbackError::ResetTimeout { .. }) | Err(LoopbackError::EngineUnusable) => {
                recover(orchestrator)
            }
            Err(_) => {}
        }
    }
}

fn recover(orchestrator: &mut Orchestrator<'static>) {
    if let Err(err) = orchestrator.reinitialize() {
        panic!("[loopback] stream engine re-initialization failed: {:?}", err);
    }
    println!("[loopback] Stream engine re-initialized");
}
