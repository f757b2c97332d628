//! 바코드 스캐너 -- 프레임 소스 + 프레임 디코더
//!
//! 카메라 스트림과 디코딩 라이브러리는 바깥 협력자입니다. 이 모듈은 두 개의 seam만 정의합니다.
//!
//! - [`FrameSource`]: 프레임 스트림을 열고 한 장씩 꺼냅니다 (획득 실패 가능)
//! - [`FrameDecoder`]: `decode(frame) -> Option<String>`
//!
//! [`BarcodeScanner`]는 첫 번째로 디코딩에 성공한 프레임에서 멈추며,
//! `CancellationToken`으로 언제든 취소할 수 있습니다.
//!
//! ```text
//! FrameSource::open ──(실패)──> ScanError::CameraUnavailable / PermissionDenied
//!        │
//!        ▼
//! next_frame ──> FrameDecoder::decode ──(Some)──> ScanOutcome
//!        │                  │
//!        │                (None) ──> 다음 프레임
//!        ▼
//!   (None / max_frames) ──> ScanError::NoBarcodeDetected
//! ```

use std::future::Future;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use healthscan_core::config::ScannerConfig;
use healthscan_core::error::ScanError;

/// 프레임 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 0부터 시작하는 프레임 번호
    pub index: usize,
    /// 원시 페이로드
    pub data: Vec<u8>,
}

/// 프레임 스트림 추상화
///
/// 카메라 장치, 녹화 파일, 테스트 mock 등이 구현합니다.
pub trait FrameSource: Send {
    /// 스트림을 엽니다. 권한 거부나 장치 부재는 여기서 보고됩니다.
    fn open(&mut self) -> impl Future<Output = Result<(), ScanError>> + Send;

    /// 다음 프레임을 반환합니다. 스트림이 끝나면 `None`입니다.
    fn next_frame(&mut self) -> impl Future<Output = Result<Option<Frame>, ScanError>> + Send;

    /// 스트림을 해제합니다. 여러 번 호출해도 안전해야 합니다.
    fn close(&mut self);
}

/// 프레임 디코더 (`decodeFrame(frame) -> Option<String>`)
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// 숫자 페이로드 디코더
///
/// 앞뒤 공백을 제거한 페이로드가 `min_len..=max_len` 자리의 숫자 문자열이면 바코드로 인정합니다.
#[derive(Debug, Clone)]
pub struct DigitFrameDecoder {
    min_len: usize,
    max_len: usize,
}

impl Default for DigitFrameDecoder {
    fn default() -> Self {
        Self::from_config(&ScannerConfig::default())
    }
}

impl DigitFrameDecoder {
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.min_code_len, config.max_code_len)
    }
}

impl FrameDecoder for DigitFrameDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        let text = std::str::from_utf8(&frame.data).ok()?.trim();
        let len_ok = (self.min_len..=self.max_len).contains(&text.len());
        if len_ok && text.bytes().all(|b| b.is_ascii_digit()) {
            Some(text.to_owned())
        } else {
            None
        }
    }
}

/// 줄 단위 프레임 소스의 입력
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameInput {
    /// 파일 (장치 파일, 녹화 덤프 등)
    Path(PathBuf),
    /// 표준 입력
    Stdin,
}

impl FrameInput {
    /// `-`는 표준 입력, 그 외는 파일 경로로 해석합니다.
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

/// 프레임 하나의 최대 바이트 수. 초과분은 다음 줄바꿈까지 버립니다.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

type FrameReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;

/// 한 줄을 한 프레임으로 취급하는 프레임 소스
///
/// 페이로드는 원시 바이트 그대로 디코더에 전달됩니다 (UTF-8이 아니어도 됨).
pub struct LineFrameSource {
    input: FrameInput,
    reader: Option<FrameReader>,
    next_index: usize,
}

impl LineFrameSource {
    pub fn new(input: FrameInput) -> Self {
        Self {
            input,
            reader: None,
            next_index: 0,
        }
    }
}

/// `\n`까지 읽어 `buf`에 최대 [`MAX_FRAME_BYTES`]만 담습니다.
///
/// 스트림 끝에서 읽은 바이트가 없으면 `false`를 반환합니다.
async fn read_frame(reader: &mut FrameReader, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    let mut seen_any = false;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(seen_any);
        }
        seen_any = true;

        let (chunk_len, consumed, done) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos, pos + 1, true),
            None => (available.len(), available.len(), false),
        };
        let room = MAX_FRAME_BYTES.saturating_sub(buf.len());
        buf.extend_from_slice(&available[..chunk_len.min(room)]);
        reader.consume(consumed);

        if done {
            return Ok(true);
        }
    }
}

impl FrameSource for LineFrameSource {
    async fn open(&mut self) -> Result<(), ScanError> {
        let reader: Box<dyn AsyncRead + Send + Unpin> = match &self.input {
            FrameInput::Path(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        ScanError::PermissionDenied(path.display().to_string())
                    } else {
                        ScanError::CameraUnavailable(format!("{}: {e}", path.display()))
                    }
                })?;
                Box::new(file)
            }
            FrameInput::Stdin => Box::new(tokio::io::stdin()),
        };
        debug!(input = ?self.input, "frame source opened");
        self.reader = Some(BufReader::new(reader));
        self.next_index = 0;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, ScanError> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| ScanError::CameraUnavailable("frame source not opened".to_owned()))?;

        let mut data = Vec::new();
        let has_frame = read_frame(reader, &mut data)
            .await
            .map_err(|e| ScanError::CameraUnavailable(format!("frame read failed: {e}")))?;
        if !has_frame {
            return Ok(None);
        }

        let frame = Frame {
            index: self.next_index,
            data,
        };
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(frames = self.next_index, "frame source closed");
        }
    }
}

/// 스캔 성공 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// 디코딩된 바코드
    pub code: String,
    /// 디코딩까지 읽은 프레임 수
    pub frames_read: usize,
}

/// 바코드 스캐너
pub struct BarcodeScanner<S, D> {
    source: S,
    decoder: D,
    /// 최대 프레임 수 (0이면 무제한)
    max_frames: usize,
}

impl<S: FrameSource, D: FrameDecoder> BarcodeScanner<S, D> {
    pub fn new(source: S, decoder: D) -> Self {
        Self {
            source,
            decoder,
            max_frames: 0,
        }
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// 스트림을 열고 첫 번째 바코드를 디코딩할 때까지 프레임을 읽습니다.
    ///
    /// 어떤 결과든 반환 전에 스트림을 닫습니다.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<ScanOutcome, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        self.source.open().await?;
        let result = self.read_until_decoded(cancel).await;
        self.source.close();
        result
    }

    async fn read_until_decoded(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, ScanError> {
        let mut frames_read = 0;

        loop {
            if self.max_frames > 0 && frames_read >= self.max_frames {
                return Err(ScanError::NoBarcodeDetected {
                    frames: frames_read,
                });
            }

            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ScanError::Cancelled),
                frame = self.source.next_frame() => frame?,
            };

            let Some(frame) = next else {
                return Err(ScanError::NoBarcodeDetected {
                    frames: frames_read,
                });
            };
            frames_read += 1;

            match self.decoder.decode(&frame) {
                Some(code) => {
                    info!(code = %code, frames_read, "barcode decoded");
                    return Ok(ScanOutcome { code, frames_read });
                }
                None => trace!(index = frame.index, "frame not decodable"),
            }
        }
    }
}

/// 테스트용 Mock 프레임 소스
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MockFrameSource {
    pub frames: std::collections::VecDeque<Vec<u8>>,
    pub open_error: Option<ScanError>,
    pub opened: bool,
    pub closed: bool,
    pub index: usize,
    /// 큐가 비면 끝내지 않고 계속 대기합니다 (라이브 카메라처럼).
    pub pend_when_empty: bool,
}

#[cfg(test)]
impl MockFrameSource {
    pub fn with_frames(frames: &[&str]) -> Self {
        Self {
            frames: frames.iter().map(|f| f.as_bytes().to_vec()).collect(),
            ..Self::default()
        }
    }

    pub fn live(frames: &[&str]) -> Self {
        Self {
            pend_when_empty: true,
            ..Self::with_frames(frames)
        }
    }

    pub fn failing(err: ScanError) -> Self {
        Self {
            open_error: Some(err),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl FrameSource for MockFrameSource {
    async fn open(&mut self) -> Result<(), ScanError> {
        if let Some(err) = self.open_error.clone() {
            return Err(err);
        }
        self.opened = true;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, ScanError> {
        if self.frames.is_empty() && self.pend_when_empty {
            std::future::pending::<()>().await;
        }
        Ok(self.frames.pop_front().map(|data| {
            let frame = Frame {
                index: self.index,
                data,
            };
            self.index += 1;
            frame
        }))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: &str) -> Frame {
        Frame {
            index: 0,
            data: data.as_bytes().to_vec(),
        }
    }

    #[test]
    fn digit_decoder_accepts_codes_in_range() {
        let decoder = DigitFrameDecoder::default();
        assert_eq!(decoder.decode(&frame("123456789")), Some("123456789".to_owned()));
        assert_eq!(decoder.decode(&frame("  12345678 \r")), Some("12345678".to_owned()));
        assert_eq!(
            decoder.decode(&frame("12345678901234")),
            Some("12345678901234".to_owned())
        );
    }

    #[test]
    fn digit_decoder_rejects_noise() {
        let decoder = DigitFrameDecoder::default();
        assert_eq!(decoder.decode(&frame("")), None);
        assert_eq!(decoder.decode(&frame("1234567")), None);
        assert_eq!(decoder.decode(&frame("123456789012345")), None);
        assert_eq!(decoder.decode(&frame("12345abc9")), None);
        assert_eq!(
            decoder.decode(&Frame {
                index: 0,
                data: vec![0xff, 0xfe, 0x00],
            }),
            None
        );
    }

    #[test]
    fn frame_input_parse() {
        assert_eq!(FrameInput::parse("-"), FrameInput::Stdin);
        assert_eq!(
            FrameInput::parse("/dev/video0"),
            FrameInput::Path(PathBuf::from("/dev/video0"))
        );
    }

    #[tokio::test]
    async fn scanner_returns_first_decoded_frame() {
        let source = MockFrameSource::with_frames(&["blur", "", "123456789", "987654321"]);
        let mut scanner = BarcodeScanner::new(source, DigitFrameDecoder::default());

        let outcome = scanner.run(&CancellationToken::new()).await.unwrap();
        assert_eq!(outcome.code, "123456789");
        assert_eq!(outcome.frames_read, 3);
        assert!(scanner.source.closed, "source should be closed after scan");
    }

    #[tokio::test]
    async fn scanner_reports_open_failure() {
        let source = MockFrameSource::failing(ScanError::PermissionDenied("camera".to_owned()));
        let mut scanner = BarcodeScanner::new(source, DigitFrameDecoder::default());

        let err = scanner.run(&CancellationToken::new()).await.unwrap_err();
        assert!(err.is_acquisition_failure());
        assert!(!scanner.source.opened);
    }

    #[tokio::test]
    async fn scanner_exhausted_stream_reports_frames() {
        let source = MockFrameSource::with_frames(&["a", "b"]);
        let mut scanner = BarcodeScanner::new(source, DigitFrameDecoder::default());

        let err = scanner.run(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err, ScanError::NoBarcodeDetected { frames: 2 });
        assert!(scanner.source.closed);
    }

    #[tokio::test]
    async fn scanner_respects_max_frames() {
        let source = MockFrameSource::with_frames(&["a", "b", "c", "123456789"]);
        let mut scanner =
            BarcodeScanner::new(source, DigitFrameDecoder::default()).with_max_frames(2);

        let err = scanner.run(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err, ScanError::NoBarcodeDetected { frames: 2 });
    }

    #[tokio::test]
    async fn scanner_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let source = MockFrameSource::with_frames(&["123456789"]);
        let mut scanner = BarcodeScanner::new(source, DigitFrameDecoder::default());

        let err = scanner.run(&cancel).await.unwrap_err();
        assert_eq!(err, ScanError::Cancelled);
        assert!(!scanner.source.opened, "cancelled scan must not open the source");
    }

    #[tokio::test]
    async fn scanner_cancelled_while_waiting_for_frames() {
        let cancel = CancellationToken::new();
        let source = MockFrameSource::live(&["blur", "noise"]);
        let mut scanner = BarcodeScanner::new(source, DigitFrameDecoder::default());

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };

        let err = scanner.run(&cancel).await.unwrap_err();
        canceller.await.unwrap();

        assert_eq!(err, ScanError::Cancelled);
        assert!(scanner.source.opened);
        assert!(scanner.source.closed, "source should be closed after cancel");
        assert_eq!(scanner.source.index, 2, "queued frames were read before cancel");
    }

    #[tokio::test]
    async fn line_source_missing_file_is_camera_unavailable() {
        let mut source = LineFrameSource::new(FrameInput::Path(PathBuf::from(
            "/nonexistent/healthscan/frames.txt",
        )));
        let err = source.open().await.unwrap_err();
        assert!(matches!(err, ScanError::CameraUnavailable(_)));
    }

    #[tokio::test]
    async fn line_source_next_before_open_fails() {
        let mut source = LineFrameSource::new(FrameInput::Stdin);
        assert!(source.next_frame().await.is_err());
    }

    #[tokio::test]
    async fn line_source_reads_frames_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("frames.txt");
        std::fs::write(&path, "noise\n987654321\n").unwrap();

        let mut scanner = BarcodeScanner::new(
            LineFrameSource::new(FrameInput::Path(path)),
            DigitFrameDecoder::default(),
        );
        let outcome = scanner.run(&CancellationToken::new()).await.unwrap();
        assert_eq!(outcome.code, "987654321");
        assert_eq!(outcome.frames_read, 2);
    }

    #[tokio::test]
    async fn line_source_skips_binary_frames() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("frames.bin");
        let mut bytes = vec![0xff, 0xfe, 0x00, b'\n'];
        bytes.extend_from_slice(b"123456789\n");
        std::fs::write(&path, bytes).unwrap();

        let mut scanner = BarcodeScanner::new(
            LineFrameSource::new(FrameInput::Path(path)),
            DigitFrameDecoder::default(),
        );
        let outcome = scanner.run(&CancellationToken::new()).await.unwrap();
        assert_eq!(outcome.code, "123456789");
        assert_eq!(outcome.frames_read, 2);
    }

    #[tokio::test]
    async fn line_source_caps_oversized_frames() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dump.bin");
        let mut bytes = vec![b'7'; MAX_FRAME_BYTES * 3];
        bytes.extend_from_slice(b"\n987654321");
        std::fs::write(&path, bytes).unwrap();

        let mut source = LineFrameSource::new(FrameInput::Path(path));
        source.open().await.unwrap();

        let first = source.next_frame().await.unwrap().expect("oversized frame");
        assert_eq!(first.data.len(), MAX_FRAME_BYTES);

        // 마지막 줄은 줄바꿈이 없어도 프레임입니다.
        let second = source.next_frame().await.unwrap().expect("trailing frame");
        assert_eq!(second.index, 1);
        assert_eq!(second.data, b"987654321");

        assert!(source.next_frame().await.unwrap().is_none());
        source.close();
    }
}
