// Licensed under the Apache-2.0 license

//! Host test bench: the real router, handlers and orchestrator wired to
//! simulated hardware.

use crate::frame::FrameHeader;
use fwtime::DmaRegion;
use intc_driver::hil::IrqHandler;
use loopback_config::LoopbackTuning;
use zerocopy::IntoBytes;

pub const BUFFER_LEN: usize = 4096;
pub const HEADER_OFFSET: usize = 4;

/// Stands in for the control-bus handler.
pub struct IgnoreIrq;

impl IrqHandler for IgnoreIrq {
    fn handle_irq(&self) {}
}

pub fn tuning() -> LoopbackTuning {
    LoopbackTuning {
        reset_poll_budget: 8,
        wait_polls: 1_000,
        ..Default::default()
    }
}

/// 0xEB90AABB, shelf 1, 252 words: a 1024 byte transfer.
pub fn sample_header() -> FrameHeader {
    FrameHeader {
        header_id: 0xeb90_aabb,
        shelf_id: 1,
        data_size: 252,
    }
}

/// What the host leaves in the ingress buffer: a payload pattern over the
/// whole transfer with the header at its offset.
pub fn host_write(region: &DmaRegion, header: FrameHeader) {
    let len = header.transfer_length() as usize;
    region
        .fill_with(len, |i| (i as u8).wrapping_mul(31).wrapping_add(7))
        .unwrap();
    region.write_bytes(HEADER_OFFSET, header.as_bytes()).unwrap();
}

/// Declares the simulated hardware and a configured orchestrator under
/// the caller's names.
macro_rules! bench {
    ($intc:ident, $engine:ident, $ingress:ident, $link:ident, $cache:ident, $orch:ident) => {
        let lines = loopback_config::IrqLines::default();
        let $intc = loopback_testing::SimIntc::new(4);
        let $engine = loopback_testing::SimStreamEngine::new(&$intc, lines.outbound, lines.inbound);
        let $ingress = loopback_testing::SimIngress::new(&$intc, lines.ingress);
        let $link = loopback_testing::SimLink::new(true);
        let $cache = loopback_testing::RecordingCache::default();
        let router = intc_driver::routing::InterruptRouter::new(&$intc, lines);
        $intc.attach_cpu(&router);

        let mut signals = $crate::signals::CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let budget = $crate::testbench::tuning().reset_poll_budget;
        let ingress_handler = $crate::handlers::IngressHandler::new(&$ingress, notifiers.ingress);
        let outbound_handler =
            $crate::handlers::StreamCompletionHandler::new(&$engine, notifiers.outbound, budget);
        let inbound_handler =
            $crate::handlers::StreamCompletionHandler::new(&$engine, notifiers.inbound, budget);
        let control_bus = $crate::testbench::IgnoreIrq;
        router
            .configure(intc_driver::routing::IrqBindings {
                ingress: &ingress_handler,
                outbound: &outbound_handler,
                inbound: &inbound_handler,
                control_bus: &control_bus,
            })
            .unwrap();

        #[allow(unused_mut)]
        let mut $orch = $crate::orchestrator::Orchestrator::new(
            $crate::orchestrator::LoopbackPeripherals {
                engine: &$engine,
                ingress: &$ingress,
                sources: &router,
                cache: &$cache,
                link: &$link,
            },
            observer,
            $crate::orchestrator::LoopbackBuffers {
                ingress: loopback_testing::dma_buffer($crate::testbench::BUFFER_LEN),
                frame_header_offset: $crate::testbench::HEADER_OFFSET,
                rx: loopback_testing::dma_buffer($crate::testbench::BUFFER_LEN),
            },
            $crate::testbench::tuning(),
        );
    };
}
