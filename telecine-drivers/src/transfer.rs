//! Chunked pixel transfer
//!
//! A full frame is far larger than one spidev transfer (320x240 RGB565 is
//! 153600 bytes against a 4096 byte default `bufsiz`), so pixel data goes
//! out as consecutive bus-sized writes. The controller sees one continuous
//! RAMWR payload as long as D/C stays high and no command intervenes.

use telecine_core::ProtocolError;
use telecine_hal::{OutputPin, SpiBus};
use tracing::{trace, warn};

/// Chunk size after capping by the bus limit
///
/// Fails on a requested size of zero.
pub fn effective_chunk_size<SPI: SpiBus>(spi: &SPI, max_chunk_bytes: usize) -> Result<usize, ProtocolError> {
    if max_chunk_bytes == 0 {
        return Err(ProtocolError::InvalidChunkSize);
    }
    Ok(max_chunk_bytes.min(spi.max_transfer_len()).max(1))
}

/// Number of writes needed for `len` bytes
pub fn chunk_count(len: usize, chunk: usize) -> usize {
    if chunk == 0 {
        return 0;
    }
    len.div_ceil(chunk)
}

/// Write `bytes` as pixel data in chunks of at most `max_chunk_bytes`
///
/// D/C is driven high once before the first chunk. On a bus failure the
/// remaining chunks are abandoned. An empty payload writes nothing.
pub fn transmit<SPI, DC>(spi: &mut SPI, dc: &mut DC, bytes: &[u8], max_chunk_bytes: usize) -> Result<(), ProtocolError>
where
    SPI: SpiBus,
    DC: OutputPin,
{
    let chunk = effective_chunk_size(spi, max_chunk_bytes)?;
    if bytes.is_empty() {
        return Ok(());
    }

    dc.set_high().map_err(|err| {
        warn!(error = ?err, "failed to drive D/C high");
        ProtocolError::ControlLineFailure
    })?;

    for (index, part) in bytes.chunks(chunk).enumerate() {
        spi.write(part).map_err(|err| {
            warn!(
                chunk = index,
                of = chunk_count(bytes.len(), chunk),
                error = ?err,
                "SPI write failed, frame abandoned"
            );
            ProtocolError::BusFailure
        })?;
    }

    trace!(len = bytes.len(), chunk, "pixel data sent");
    Ok(())
}
