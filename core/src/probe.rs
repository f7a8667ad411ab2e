//! The probe capability the search engine is driven by.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use culprit_types::{Index, ProbeError, ProbeReport, Status};

/// Probe future type alias.
pub type ProbeFut<'a> = Pin<Box<dyn Future<Output = Result<ProbeReport, ProbeError>> + Send + 'a>>;

/// Something that can report the status at an index.
///
/// Implementations run one probe per call and must not cache: the engine
/// never asks for the same index twice on a monotonic sequence, and when it
/// does the probe is run again.
pub trait Probe: Send {
    fn invoke(&mut self, index: Index) -> ProbeFut<'_>;
}

impl<P: Probe + ?Sized> Probe for &mut P {
    fn invoke(&mut self, index: Index) -> ProbeFut<'_> {
        (**self).invoke(index)
    }
}

impl<P: Probe + ?Sized> Probe for Box<P> {
    fn invoke(&mut self, index: Index) -> ProbeFut<'_> {
        (**self).invoke(index)
    }
}

/// Adapts a plain status function into a [`Probe`].
///
/// The probe value is the decimal index.
pub struct FnProbe<F>(pub F);

impl<F> Probe for FnProbe<F>
where
    F: FnMut(Index) -> Result<Status, ProbeError> + Send,
{
    fn invoke(&mut self, index: Index) -> ProbeFut<'_> {
        let start = Instant::now();
        let result = (self.0)(index);
        let elapsed = start.elapsed();
        Box::pin(async move {
            Ok(ProbeReport {
                index,
                value: index.to_string(),
                status: result?,
                elapsed,
            })
        })
    }
}
